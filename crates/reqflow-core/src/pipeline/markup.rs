//! Mermaid markup cleanup and URL encoding

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

const FENCE_OPEN: &str = "```mermaid";
const FENCE: &str = "```";

/// Diagram source from a model reply
///
/// Takes the body of the first ```` ```mermaid ```` fence (up to the closing
/// fence or end of text), or the whole reply when there is none, then rewrites
/// the `|>` edge-label endings models like to emit into `|`.
pub fn extract_mermaid(reply: &str) -> String {
    let body = match reply.split_once(FENCE_OPEN) {
        Some((_, rest)) => rest.split(FENCE).next().unwrap_or(rest),
        None => reply,
    };
    body.trim().replace("|>", "|")
}

/// URL-safe, padded base64 of the markup bytes
pub fn encode_markup(markup: &str) -> String {
    URL_SAFE.encode(markup.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block_is_extracted() {
        let reply = "Sure!\n```mermaid\ngraph LR;\nUser -->|Accesses|> App;\n```\nEnjoy.";
        assert_eq!(extract_mermaid(reply), "graph LR;\nUser -->|Accesses| App;");
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        assert_eq!(extract_mermaid("```mermaid\ngraph TD;\nA-->B;"), "graph TD;\nA-->B;");
    }

    #[test]
    fn test_no_fence_uses_raw_reply() {
        assert_eq!(extract_mermaid("  graph LR;\nA -->|x|> B;\n"), "graph LR;\nA -->|x| B;");
    }

    #[test]
    fn test_encoding_is_url_safe_and_padded() {
        // '>' and '?' land on the '+' and '/' code points in standard base64
        let encoded = encode_markup("A-->B??>");
        assert!(!encoded.contains('+') && !encoded.contains('/'));
        assert_eq!(encoded, "QS0tPkI_Pz4=");
    }
}
