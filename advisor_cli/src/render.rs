//! Terminal rendering for the chat front end.

use advisor_core::{Catalogue, REPLY_CUE};
use field_state::{HealthStatus, SessionContext};

/// Header naming the detected condition.
pub fn banner(session: &SessionContext) -> String {
    format!(
        "== DETECTED: {} ==\nCrop: {} | Status: {} ({})\n\n",
        session.condition.to_uppercase(),
        session.crop,
        session.status,
        session.health()
    )
}

/// Opening line from the advisor.
pub fn greeting(session: &SessionContext) -> String {
    let focus = match session.health() {
        HealthStatus::Healthy => "keep it that way",
        HealthStatus::Diseased => "treat it",
        HealthStatus::Unknown => "work out what it needs",
    };
    format!(
        "{} Hello! I have analyzed your {} ({}) and can help you {}. \
         Pick a suggested question or type your own.",
        REPLY_CUE, session.crop, session.condition, focus
    )
}

/// Ranked suggestions, numbered for `/pick`. Popular entries are starred.
pub fn suggestions(catalogue: &Catalogue, popular_weight: f64) -> String {
    let mut out = String::from("RECOMMENDED QUESTIONS\n");
    for (c, category) in catalogue.categories().iter().enumerate() {
        out.push_str(&format!("{}. {}\n", c + 1, category.name));
        for (q, entry) in category.entries.iter().enumerate() {
            let marker = if entry.is_popular(popular_weight) { '*' } else { ' ' };
            out.push_str(&format!(
                "   {} {}.{} {} ({:.2})\n",
                marker,
                c + 1,
                q + 1,
                entry.text,
                entry.weight
            ));
        }
    }
    out
}

pub fn reply(text: &str) -> String {
    format!("{} {}\n", REPLY_CUE, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner() {
        let session = SessionContext::new("Tomato", "Early Blight", "DEFECTIVE");
        let banner = banner(&session);
        assert!(banner.contains("DETECTED: EARLY BLIGHT"));
        assert!(banner.contains("DISEASED"));
    }

    #[test]
    fn test_greeting_follows_health() {
        let healthy = SessionContext::new("Wheat", "None", "HEALTHY");
        assert!(greeting(&healthy).contains("keep it that way"));
        assert!(greeting(&SessionContext::default()).contains("Generic"));
    }

    #[test]
    fn test_suggestions_numbering_and_markers() {
        let text = suggestions(&Catalogue::defaults(), 0.8);
        assert!(text.contains("1. 1️⃣ Core Questions\n"));
        assert!(text.contains("   * 1.1 What is the problem with this crop? (0.90)\n"));
        assert!(text.contains("     1.2 Is this a serious problem? (0.80)\n"));
        assert!(text.contains("     4.2 Should I spray leaves or soil? (0.50)\n"));
    }

    #[test]
    fn test_reply_prefix() {
        assert_eq!(reply("Water early."), "AGRO-TWIN: Water early.\n");
    }
}
