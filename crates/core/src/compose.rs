use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

use crate::{schema::report_schema, types::VideoMetadata};

/// Whether the submitted title points at a published video or is a draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Grounded: the provider looks the real video up with web search.
    Url,
    /// Heuristic: the literal title/description is judged as written.
    Draft,
}

impl InputMode {
    pub fn classify(title: &str) -> Self {
        let lowered = title.trim().to_lowercase();
        let is_url = lowered.split_whitespace().any(|token| {
            token
                .find("http")
                .and_then(|start| Url::parse(&token[start..]).ok())
                .is_some_and(|url| {
                    matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
                })
        });

        if is_url { InputMode::Url } else { InputMode::Draft }
    }
}

/// Thumbnail payload as raw base64 plus its MIME type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    pub mime_type: String,
    pub data: String,
}

impl Thumbnail {
    pub const DEFAULT_MIME_TYPE: &'static str = "image/jpeg";

    /// Accepts either a `data:<mime>;base64,<payload>` URL or a bare payload.
    pub fn from_data_url(input: &str) -> Self {
        match input.split_once(',') {
            Some((header, payload)) => {
                let mime_type = header
                    .strip_prefix("data:")
                    .and_then(|rest| rest.split(';').next())
                    .filter(|mime| !mime.is_empty())
                    .unwrap_or(Self::DEFAULT_MIME_TYPE);
                Self {
                    mime_type: mime_type.to_string(),
                    data: payload.trim().to_string(),
                }
            }
            None => Self {
                mime_type: Self::DEFAULT_MIME_TYPE.to_string(),
                data: input.trim().to_string(),
            },
        }
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }
}

/// One entry of the provider's `parts` array.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentPart {
    Text(String),
    InlineData(Thumbnail),
}

#[derive(Clone, Debug)]
pub struct AnalysisRequest {
    pub mode: InputMode,
    pub instruction: String,
    pub parts: Vec<ContentPart>,
    pub schema: Value,
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() { placeholder } else { value.trim() }
}

fn source_section(mode: InputMode, metadata: &VideoMetadata) -> String {
    let title = metadata.title.trim();
    match mode {
        InputMode::Url => format!(
            "IMPORTANT: The user has provided a video URL: {title}\n\n\
             ACTION REQUIRED: Use Google Search to retrieve the ACTUAL details of this video on \
             {platform}: the exact title, the creator, a summary of what happens in the video, and \
             any available engagement or audience sentiment signals (views, likes, comment tone). \
             Base the whole evaluation on the retrieved data, not on the literal URL string.",
            platform = metadata.platform.name(),
        ),
        InputMode::Draft => format!(
            "IMPORTANT: The user has provided an unpublished draft titled: \"{title}\"\n\n\
             Evaluate the literal title and description below against general virality \
             heuristics for the {niche} niche on {platform}. Do not claim any facts about a real \
             published video, its creator or its performance.",
            niche = metadata.niche,
            platform = metadata.platform.name(),
        ),
    }
}

fn thumbnail_criterion(has_image: bool) -> &'static str {
    if has_image {
        "Thumbnail hook potential: assess the attached thumbnail image for contrast, faces, \
         text legibility at small size and curiosity gap. Report it as thumbnailScore."
    } else {
        "Thumbnail hook potential: no thumbnail image was supplied. Do not invent one; score \
         thumbnailScore from the hook strength of the title alone and say so in its insights."
    }
}

fn build_instruction(mode: InputMode, metadata: &VideoMetadata, has_image: bool) -> String {
    let hashtags = if metadata.hashtags.is_empty() {
        "None".to_string()
    } else {
        metadata.hashtags.join(" ")
    };

    format!(
        "{source}\n\n\
         Analyze this content for virality potential on {platform_display}.\n\n\
         Provided metadata:\n\
         - Title/URL: {title}\n\
         - User's description: {description}\n\
         - Hashtags: {hashtags}\n\
         - Target niche: {niche}\n\n\
         Evaluation matrix:\n\
         1. Metadata & SEO quality: title clarity, keywords, emotional trigger of the hook and \
         description. Report it as metadataScore.\n\
         2. {thumbnail}\n\
         3. Retention structure: predict where viewers drop off or re-engage. Report it as \
         videoScore and list each moment in timelineIssues with a timestamp, a type (drop, \
         attention or low-quality), a message and a display color.\n\
         4. Trend correlation: compare the topic and format against current viral patterns in \
         the {niche} niche. Report it as trendScore.\n\
         5. Action plan: exactly 5 specific, high-impact tasks ordered by importance, each with \
         a priority (High, Medium or Low) and its expected impact.\n\
         6. Generated assets: alternative high-CTR titles, a description hook, optimized \
         hashtags for {platform} and a prompt for generating a thumbnail.\n\n\
         Return a valid JSON response according to the schema: overallScore, exactly four score \
         components (metadataScore, thumbnailScore, videoScore, trendScore), timelineIssues, \
         actionPlan and generatedAssets. Every field is required.",
        source = source_section(mode, metadata),
        platform_display = metadata.platform.display_name(),
        platform = metadata.platform.name(),
        title = metadata.title.trim(),
        description = or_placeholder(&metadata.description, "Not provided"),
        hashtags = hashtags,
        niche = metadata.niche,
        thumbnail = thumbnail_criterion(has_image),
    )
}

/// Build the provider request for one analysis.
///
/// The text part always comes first; the thumbnail, when present, is the
/// second and last part.
pub fn compose(metadata: &VideoMetadata, thumbnail: Option<&Thumbnail>) -> AnalysisRequest {
    let mode = InputMode::classify(&metadata.title);
    let instruction = build_instruction(mode, metadata, thumbnail.is_some());

    let mut parts = vec![ContentPart::Text(instruction.clone())];
    if let Some(image) = thumbnail {
        parts.push(ContentPart::InlineData(image.clone()));
    }

    tracing::debug!(?mode, parts = parts.len(), "composed analysis request");

    AnalysisRequest {
        mode,
        instruction,
        parts,
        schema: report_schema(),
    }
}
