//! Declared reference store: one `identity<TAB>kind<TAB>label` record per line.
//!
//! Loading splits on the first two tabs only, so labels may contain tabs.
//! Nothing else is escaped: fields that cannot be represented are rejected on save.

use crate::write::{WriteOutcome, write_if_changed};
use camino::{Utf8Path, Utf8PathBuf};
use reftrim_domain::model::{DeclaredReference, ReferenceKind};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("declared reference file not found: {path}")]
    Missing { path: Utf8PathBuf },

    #[error("io error on {path}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {reason}")]
    Malformed {
        path: Utf8PathBuf,
        line: usize,
        reason: String,
    },

    #[error("record {index}: {field} {reason}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: &'static str,
    },
}

impl StoreError {
    pub fn is_input_missing(&self) -> bool {
        matches!(self, StoreError::Missing { .. })
    }
}

/// Serialize records, validating every field first. Nothing is produced on error.
pub fn render_declared_references(records: &[DeclaredReference]) -> Result<String, StoreError> {
    let mut out = String::new();
    for (index, record) in records.iter().enumerate() {
        if has_line_break(&record.identity) {
            return Err(StoreError::InvalidField {
                index,
                field: "identity",
                reason: "contains a line break",
            });
        }
        if record.identity.contains('\t') {
            return Err(StoreError::InvalidField {
                index,
                field: "identity",
                reason: "contains a tab",
            });
        }
        if has_line_break(&record.label) {
            return Err(StoreError::InvalidField {
                index,
                field: "label",
                reason: "contains a line break",
            });
        }

        out.push_str(&record.identity);
        out.push('\t');
        out.push_str(record.kind.as_str());
        out.push('\t');
        out.push_str(&record.label);
        out.push('\n');
    }
    Ok(out)
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\n', '\r'])
}

/// Persist records in order. Skips the physical write when the file already
/// holds identical content.
pub fn save_declared_references(
    path: &Utf8Path,
    records: &[DeclaredReference],
) -> Result<WriteOutcome, StoreError> {
    let text = render_declared_references(records)?;
    let outcome = write_if_changed(path, text.as_bytes()).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match outcome {
        WriteOutcome::Written => info!(path = %path, records = records.len(), "wrote declared references"),
        WriteOutcome::Unchanged => debug!(path = %path, "declared references unchanged"),
    }
    Ok(outcome)
}

/// Parse store text. `path` is only used for error messages.
///
/// Any bad line fails the whole parse; there is no partial result.
pub fn parse_declared_references(
    path: &Utf8Path,
    text: &str,
) -> Result<Vec<DeclaredReference>, StoreError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let body = text.strip_suffix('\n').unwrap_or(text);
    let mut records = Vec::new();
    for (i, raw) in body.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let malformed = |reason: String| StoreError::Malformed {
            path: path.to_path_buf(),
            line: i + 1,
            reason,
        };

        let mut fields = line.splitn(3, '\t');
        let (Some(identity), Some(kind), Some(label)) = (fields.next(), fields.next(), fields.next())
        else {
            let count = line.splitn(3, '\t').count();
            return Err(malformed(format!("expected 3 tab-separated fields, found {count}")));
        };
        let kind = ReferenceKind::parse(kind)
            .ok_or_else(|| malformed(format!("unknown kind '{kind}'")))?;

        records.push(DeclaredReference::new(identity, kind, label));
    }
    Ok(records)
}

pub fn load_declared_references(path: &Utf8Path) -> Result<Vec<DeclaredReference>, StoreError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            StoreError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_declared_references(path, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn sample() -> Vec<DeclaredReference> {
        vec![
            DeclaredReference::new("/lib/x.dll", ReferenceKind::Direct, "x"),
            DeclaredReference::new("", ReferenceKind::Module, "../Core/Core.csproj"),
            DeclaredReference::new(
                "/nuget/serilog/3.1.1/lib/net6.0/Serilog.dll",
                ReferenceKind::Package,
                "Serilog",
            ),
            DeclaredReference::new("/lib/y.dll", ReferenceKind::Direct, "label\twith tab"),
        ]
    }

    #[test]
    fn save_then_load_preserves_records_and_order() {
        let tmp = TempDir::new().expect("temp dir");
        let path = utf8_root(&tmp).join("obj/refs.txt");

        let outcome = save_declared_references(&path, &sample()).expect("save");
        assert_eq!(outcome, WriteOutcome::Written);
        assert_eq!(load_declared_references(&path).expect("load"), sample());

        let again = save_declared_references(&path, &sample()).expect("save");
        assert_eq!(again, WriteOutcome::Unchanged);
    }

    #[test]
    fn two_field_line_is_fatal_with_line_number() {
        let text = "/lib/x.dll\tdirect\tx\n/lib/y.dll\tdirect\n";
        let err = parse_declared_references(Utf8Path::new("refs.txt"), text).expect_err("malformed");
        match err {
            StoreError::Malformed { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("found 2"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_token_is_fatal() {
        let err = parse_declared_references(Utf8Path::new("refs.txt"), "a\tanalyzer\tb\n")
            .expect_err("unknown kind");
        assert!(err.to_string().contains("unknown kind 'analyzer'"));
    }

    #[test]
    fn crlf_and_empty_input() {
        let records =
            parse_declared_references(Utf8Path::new("refs.txt"), "a\tdirect\tA\r\nb\tmodule\tB\r\n")
                .expect("parse");
        assert_eq!(records[0].label, "A");
        assert_eq!(records[1].kind, ReferenceKind::Module);

        assert!(parse_declared_references(Utf8Path::new("refs.txt"), "").expect("parse").is_empty());
    }

    #[test]
    fn unrepresentable_fields_are_rejected() {
        let bad_label = [DeclaredReference::new("a", ReferenceKind::Direct, "two\nlines")];
        assert!(matches!(
            render_declared_references(&bad_label),
            Err(StoreError::InvalidField { field: "label", .. })
        ));

        let bad_identity = [DeclaredReference::new("a\tb", ReferenceKind::Direct, "x")];
        assert!(matches!(
            render_declared_references(&bad_identity),
            Err(StoreError::InvalidField { field: "identity", .. })
        ));
    }

    #[test]
    fn missing_file_is_input_missing() {
        let tmp = TempDir::new().expect("temp dir");
        let err = load_declared_references(&utf8_root(&tmp).join("nope.txt")).expect_err("missing");
        assert!(err.is_input_missing());
    }

    fn arb_kind() -> impl Strategy<Value = ReferenceKind> {
        prop_oneof![
            Just(ReferenceKind::Direct),
            Just(ReferenceKind::Module),
            Just(ReferenceKind::Package),
        ]
    }

    fn arb_record() -> impl Strategy<Value = DeclaredReference> {
        ("[^\t\r\n]{0,24}", arb_kind(), "[^\r\n]{0,24}")
            .prop_map(|(identity, kind, label)| DeclaredReference::new(identity, kind, label))
    }

    proptest! {
        #[test]
        fn render_parse_round_trip(records in prop::collection::vec(arb_record(), 0..16)) {
            let text = render_declared_references(&records).expect("representable");
            let parsed = parse_declared_references(Utf8Path::new("refs.txt"), &text).expect("parse");
            prop_assert_eq!(parsed, records);
        }

        #[test]
        fn parser_never_panics(input in ".*") {
            let _ = parse_declared_references(Utf8Path::new("refs.txt"), &input);
        }
    }
}
