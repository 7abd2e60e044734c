//! Deterministic stub backend
//!
//! Used whenever the external credential is absent. Synthesizes
//! non-empty content for every field from the request's local grounding
//! (plan fields, client name, retrieved chunk text) with no I/O at all,
//! so the pipeline stays runnable end-to-end offline and output is
//! reproducible across runs.

use async_trait::async_trait;

use crate::types::{
    BackendMode, GenerationBackend, GenerationError, GenerationRequest, RawFields, StringOrList,
};

const STUB_HASHTAGS: [&str; 5] = [
    "#ClinicEducation",
    "#PatientFirst",
    "#Healthcare",
    "#InformedDecisions",
    "#Toronto",
];

/// How much of each grounding chunk feeds the stub caption.
const EXCERPT_CHARS: usize = 120;

/// Deterministic generation backend with no external dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubBackend;

impl StubBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GenerationBackend for StubBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Stub
    }

    async fn generate(&self, req: &GenerationRequest) -> Result<RawFields, GenerationError> {
        let g = &req.grounding;

        let facts = g
            .chunk_excerpts
            .iter()
            .take(2)
            .map(|text| text.chars().take(EXCERPT_CHARS).collect::<String>())
            .collect::<Vec<_>>()
            .join(" ");

        let caption = format!(
            "{} for {}. At {}, we focus on clarity and safe expectations. {}",
            title_case(&g.angle),
            g.service,
            g.client_name,
            facts
        )
        .trim()
        .to_string();

        Ok(RawFields {
            caption: Some(caption),
            hashtags: Some(StringOrList::List(
                STUB_HASHTAGS.iter().map(ToString::to_string).collect(),
            )),
            soft_cta: Some(g.cta.clone()),
            disclaimer: Some(g.disclaimer.clone()),
            reel_script: Some(StringOrList::List(vec![
                "Hook: One thing people often misunderstand.".to_string(),
                "Point 1: What to expect in simple terms.".to_string(),
                "Point 2: Safety and realistic expectations.".to_string(),
                format!("CTA: {}", g.cta),
            ])),
        })
    }
}

/// Capitalize the first letter of each whitespace-separated word.
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
