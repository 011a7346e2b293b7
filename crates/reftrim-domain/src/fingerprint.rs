use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a reference finding.
///
/// Identity fields:
/// - check_id
/// - code
/// - project path
/// - reference label
pub fn fingerprint_for_reference(check_id: &str, code: &str, project: &str, label: &str) -> String {
    let canonical = [check_id, code, project, label].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_field_sensitive() {
        let a = fingerprint_for_reference("refs.direct_reference", "reference_removable", "App.csproj", "x");
        let b = fingerprint_for_reference("refs.direct_reference", "reference_removable", "App.csproj", "x");
        let c = fingerprint_for_reference("refs.direct_reference", "reference_removable", "App.csproj", "y");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
