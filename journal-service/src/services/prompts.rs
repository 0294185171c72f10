//! Prompt templates sent to the completion endpoint.

use crate::config::ProfessionalHelpPolicy;
use crate::models::LogRecord;

/// Closing sentence every trend report must carry.
pub const CRISIS_RESOURCE_SENTENCE: &str =
    "If you're in crisis or need support, text 988 or call the Suicide & Crisis Lifeline.";

/// Prompt for a single journal entry.
///
/// The headers requested here are the ones `analysis::parse_analysis` reads
/// back; change both together.
pub fn entry_analysis_prompt(entry: &str, timestamp: &str) -> String {
    format!(
        r#"This is a journal entry: "{entry}"
Date: {timestamp}

Analyze the tone, emotional state, and check for any language that might indicate paranoia or distress.
Please compile them under Words of Concern, and only compile words that are concerning, if any.
Also note whether the entry seems to be realistic and founded in reality. If not, gently remind them of a more realistic alternative.
Return a gentle, supportive message.

Please also include a *Mood Score* (a number between -1 and +1):
- -1 = extremely distressed or paranoid
-  0 = neutral
- +1 = calm or positive

Please respond with the following format, make sure to include these headers, also put the mood score at the end of the supportive message as well as under the designated header:
*Tone:* ...
*Emotional Stress:* ...
*Analysis:* ...
*Words of Concern:* ...
*Mood Score:* ...
*Supportive Message:* ...
"#
    )
}

/// `Entry N (timestamp):\ntext` blocks separated by a blank line.
pub fn entries_block(logs: &[LogRecord]) -> String {
    logs.iter()
        .enumerate()
        .map(|(i, log)| format!("Entry {} ({}):\n{}", i + 1, log.timestamp, log.entry))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Prompt for the trend report over several entries.
pub fn trend_report_prompt(logs: &[LogRecord], policy: ProfessionalHelpPolicy) -> String {
    let professional_help = match policy {
        ProfessionalHelpPolicy::Always => {
            "Offer gentle courses of action and ALWAYS recommend talking to a licensed mental health professional."
        }
        ProfessionalHelpPolicy::WhenDistressed => {
            "Offer gentle courses of action. If the entries show signs of distress, recommend talking to a licensed mental health professional."
        }
    };

    format!(
        r#"You are a compassionate mental health assistant analyzing {count} recent journal entries from a user.

Please:
1. Identify emotional trends and provide an average *Mood Score* (range: -1 to +1).
2. {professional_help}
3. If there are any delusional or psychosis-like elements (fantasy, ghosts, aliens, conspiracies, paranoia, etc.), note the patterns or recurring themes in a respectful way.
4. End with mental health crisis resources: "{CRISIS_RESOURCE_SENTENCE}"

Here are the recent entries:
{entries}
"#,
        count = logs.len(),
        entries = entries_block(logs),
    )
}

/// Prompt accompanying an image for the grounding exercise.
pub fn image_grounding_prompt(characteristic: &str) -> String {
    format!(
        "First of all, identify the main object in the image (ignore background). \
         Is this object primarily something of the characteristic {characteristic}? \
         Answer yes or no with a short reason."
    )
}
