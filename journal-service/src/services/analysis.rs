//! Section grammar for the model's entry analysis.
//!
//! The analysis prompt asks for `*Header:*` markers. The model is free text,
//! so parsing is best effort: every field is optional and nothing here may
//! panic on arbitrary input. Bump [`GRAMMAR_VERSION`] whenever the prompt's
//! headers or the accepted marker syntax change.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const GRAMMAR_VERSION: u32 = 1;

/// Matches `*Header:*`, `**Header:**`, `*Header*:` and similar markers.
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\*{1,2}\s*(tone|emotional stress|analysis|words of concern|mood score|supportive message)\s*:?\s*\*{1,2}\s*:?",
    )
    .expect("header regex is invalid")
});

static SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+-]?\d+(?:\.\d+)?").expect("score regex is invalid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Tone,
    EmotionalStress,
    Analysis,
    WordsOfConcern,
    MoodScore,
    SupportiveMessage,
}

impl Section {
    fn from_header(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "tone" => Some(Self::Tone),
            "emotional stress" => Some(Self::EmotionalStress),
            "analysis" => Some(Self::Analysis),
            "words of concern" => Some(Self::WordsOfConcern),
            "mood score" => Some(Self::MoodScore),
            "supportive message" => Some(Self::SupportiveMessage),
            _ => None,
        }
    }
}

/// Structured view of one analysis response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryAnalysis {
    pub grammar_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotional_stress: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub words_of_concern: Vec<String>,
    /// Clamped to [-1, +1]. `None` when the model gave no readable score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supportive_message: Option<String>,
}

/// Parse the sections of an analysis. Returns `None` when no header is found.
///
/// The first occurrence of a header wins; a section runs until the next
/// recognised header or the end of the text. The supportive message also
/// stops at the first `*` after its header.
pub fn parse_analysis(text: &str) -> Option<EntryAnalysis> {
    let markers: Vec<(Section, usize, usize)> = HEADER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let section = Section::from_header(caps.get(1)?.as_str())?;
            Some((section, whole.start(), whole.end()))
        })
        .collect();

    if markers.is_empty() {
        return None;
    }

    let mut analysis = EntryAnalysis {
        grammar_version: GRAMMAR_VERSION,
        ..Default::default()
    };
    let mut seen: Vec<Section> = Vec::with_capacity(markers.len());

    for (i, (section, _, body_start)) in markers.iter().enumerate() {
        if seen.contains(section) {
            continue;
        }
        seen.push(*section);

        let body_end = markers
            .get(i + 1)
            .map(|(_, start, _)| *start)
            .unwrap_or(text.len());
        let body = text[*body_start..body_end].trim();

        match section {
            Section::Tone => analysis.tone = non_empty(body),
            Section::EmotionalStress => analysis.emotional_stress = non_empty(body),
            Section::Analysis => analysis.summary = non_empty(body),
            Section::WordsOfConcern => analysis.words_of_concern = concern_list(body),
            Section::MoodScore => analysis.mood_score = parse_score(body),
            Section::SupportiveMessage => {
                analysis.supportive_message = non_empty(up_to_marker(body))
            }
        }
    }

    Some(analysis)
}

/// First signed decimal in `body`, clamped to [-1, +1].
pub fn parse_score(body: &str) -> Option<f64> {
    SCORE
        .find(body)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|score| score.is_finite())
        .map(|score| score.clamp(-1.0, 1.0))
}

/// Text before the first `*`, trimmed.
fn up_to_marker(body: &str) -> &str {
    body.split('*').next().unwrap_or_default().trim()
}

fn non_empty(body: &str) -> Option<String> {
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

fn concern_list(body: &str) -> Vec<String> {
    body.split(|c: char| c == ',' || c == '\n')
        .map(|item| {
            item.trim()
                .trim_start_matches(['-', '*', '•'])
                .trim()
                .trim_matches(['"', '\'', '“', '”'])
                .trim()
        })
        .filter(|item| !item.is_empty())
        .filter(|item| {
            !matches!(
                item.to_ascii_lowercase().trim_end_matches('.'),
                "none" | "n/a" | "no concerning words" | "no words of concern"
            )
        })
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
*Tone:* Calm and reflective.
*Emotional Stress:* Low.
*Analysis:* The entry is grounded in everyday events.
*Words of Concern:* None
*Mood Score:* 0.6
*Supportive Message:* It sounds like today went well. Keep it up! (Mood Score: 0.6)";

    #[test]
    fn parses_every_section() {
        let analysis = parse_analysis(WELL_FORMED).unwrap();

        assert_eq!(analysis.grammar_version, GRAMMAR_VERSION);
        assert_eq!(analysis.tone.as_deref(), Some("Calm and reflective."));
        assert_eq!(analysis.emotional_stress.as_deref(), Some("Low."));
        assert_eq!(
            analysis.summary.as_deref(),
            Some("The entry is grounded in everyday events.")
        );
        assert!(analysis.words_of_concern.is_empty());
        assert_eq!(analysis.mood_score, Some(0.6));
        assert_eq!(
            analysis.supportive_message.as_deref(),
            Some("It sounds like today went well. Keep it up! (Mood Score: 0.6)")
        );
    }

    #[test]
    fn accepts_bold_markdown_headers() {
        let text = "**Mood Score:** -0.75\n**Supportive Message:** You are not alone.";
        let analysis = parse_analysis(text).unwrap();

        assert_eq!(analysis.mood_score, Some(-0.75));
        assert_eq!(analysis.supportive_message.as_deref(), Some("You are not alone."));
    }

    #[test]
    fn supportive_message_stops_at_first_asterisk() {
        let analysis = parse_analysis("*Supportive Message:* You are **not** alone.").unwrap();
        assert_eq!(analysis.supportive_message.as_deref(), Some("You are"));

        let analysis =
            parse_analysis("*Supportive Message:* Keep going. *Mood Score: 0.6*").unwrap();
        assert_eq!(analysis.supportive_message.as_deref(), Some("Keep going."));
    }

    #[test]
    fn supportive_message_starting_with_marker_is_none() {
        let analysis = parse_analysis("*Supportive Message:* *Tone:* calm").unwrap();
        assert_eq!(analysis.supportive_message, None);
        assert_eq!(analysis.tone.as_deref(), Some("calm"));
    }

    #[test]
    fn collects_words_of_concern() {
        let text = "*Words of Concern:* \"watched\", followed\n- hopeless\n*Mood Score:* -0.4";
        let analysis = parse_analysis(text).unwrap();

        assert_eq!(
            analysis.words_of_concern,
            vec!["watched".to_string(), "followed".into(), "hopeless".into()]
        );
    }

    #[test]
    fn clamps_out_of_range_score() {
        assert_eq!(parse_score("5"), Some(1.0));
        assert_eq!(parse_score("-3.5 (very low)"), Some(-1.0));
        assert_eq!(parse_score("+0.25"), Some(0.25));
    }

    #[test]
    fn missing_score_is_none_not_zero() {
        let analysis = parse_analysis("*Mood Score:* unclear\n*Tone:* mixed").unwrap();
        assert_eq!(analysis.mood_score, None);
        assert_eq!(analysis.tone.as_deref(), Some("mixed"));
    }

    #[test]
    fn first_occurrence_of_header_wins() {
        let text = "*Mood Score:* 0.1\n*Supportive Message:* ok\n*Mood Score:* 0.9";
        assert_eq!(parse_analysis(text).unwrap().mood_score, Some(0.1));
    }

    // The grammar depends on the model echoing the requested markers. Plain
    // prose, or headers without asterisks, yield no structure at all.
    #[test]
    fn unmarked_prose_is_not_parsed() {
        assert_eq!(parse_analysis("Mood Score: 0.5. You're doing great."), None);
        assert_eq!(parse_analysis(""), None);
    }

    #[test]
    fn never_panics_on_arbitrary_input() {
        let inputs = [
            "*",
            "**",
            "*Tone:*",
            "*Mood Score:*",
            "*Mood Score:* 1e309",
            "*Supportive Message:* ünïcødé ✨ *Tone:*",
            "*Tone:**Tone:**Tone:*",
        ];
        for input in inputs {
            let _ = parse_analysis(input);
        }
        assert_eq!(parse_analysis("*Tone:*").unwrap().tone, None);
    }
}
