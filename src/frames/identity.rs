use sha1::{Digest, Sha1};

/// SHA-1 hex digest of a frame's initial markup.
pub fn frame_fingerprint(markup: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(markup.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Short name for a frame the orchestrator injected into, e.g.
/// `srcdoc-3f2a9c1e`.
pub fn injected_frame_name(prefix: &str, fingerprint: &str) -> String {
    let short: String = fingerprint.chars().take(8).collect();
    format!("{}-{}", prefix, short)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_sha1_hex() {
        let a = frame_fingerprint("<body></body>");
        assert_eq!(a.len(), 40);
        assert_eq!(a, frame_fingerprint("<body></body>"));
        assert_ne!(a, frame_fingerprint("<body><form></form></body>"));
    }

    #[test]
    fn injected_names_use_eight_hex_digits() {
        let name = injected_frame_name("blank", &frame_fingerprint(""));
        assert_eq!(name, "blank-da39a3ee");
    }
}
