use tracing::debug;

use crate::types::{ItemKind, OwnerTrust, TrustItem, Validity};

/// Parses one colon-delimited trust record emitted by the engine.
///
/// Record shape: `<level>:<keyid>:<type>:<ownertrust>:<validity>:<name>`.
/// Lines whose first field is not an integer are not trust records
/// (status chatter, version banners) and yield `None`, as do records
/// with an empty key ID or an unrecognized type code.
pub fn parse_trust_record(line: &str) -> Option<TrustItem> {
    let fields: Vec<&str> = line.split(':').collect();
    if fields.len() < 6 {
        if !line.trim().is_empty() {
            debug!(line, "skipping line with too few fields");
        }
        return None;
    }

    let level = match fields[0].trim().parse::<u32>() {
        Ok(level) => level,
        Err(_) => {
            debug!(record_type = fields[0], "skipping non-trust record");
            return None;
        }
    };

    let keyid = fields[1];
    if keyid.is_empty() {
        debug!("skipping trust record with empty keyid");
        return None;
    }

    let Some(kind) = ItemKind::from_record_code(fields[2]) else {
        debug!(code = fields[2], "skipping trust record with unknown type");
        return None;
    };

    let owner_trust = fields[3]
        .chars()
        .next()
        .map(OwnerTrust::from_gpg_char)
        .unwrap_or_default();

    let validity = fields[4]
        .chars()
        .next()
        .map(Validity::from_gpg_char)
        .unwrap_or_default();

    Some(TrustItem {
        level,
        keyid: keyid.to_string(),
        kind,
        owner_trust,
        validity,
        name: fields[5].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_KEY_RECORD: &str = "1:A0FF4590BB6122EDEF6E3C542D727CC768697734:1:f:u:";
    const SAMPLE_UID_RECORD: &str =
        "1:A0FF4590BB6122EDEF6E3C542D727CC768697734:2:f:u:Alice (demo key) <alice@example.net>";

    #[test]
    fn test_parse_key_record() {
        let item = parse_trust_record(SAMPLE_KEY_RECORD).unwrap();
        assert_eq!(item.level, 1);
        assert_eq!(item.keyid, "A0FF4590BB6122EDEF6E3C542D727CC768697734");
        assert_eq!(item.kind, ItemKind::Key);
        assert_eq!(item.owner_trust, OwnerTrust::Full);
        assert_eq!(item.validity, Validity::Ultimate);
        assert!(item.name.is_empty());
    }

    #[test]
    fn test_parse_uid_record() {
        let item = parse_trust_record(SAMPLE_UID_RECORD).unwrap();
        assert_eq!(item.kind, ItemKind::UserId);
        assert_eq!(item.name, "Alice (demo key) <alice@example.net>");
    }

    #[test]
    fn test_parse_deeper_level() {
        let item = parse_trust_record("3:786C63F330D7CB92:1:m:q:").unwrap();
        assert_eq!(item.level, 3);
        assert_eq!(item.owner_trust, OwnerTrust::Marginal);
        assert_eq!(item.validity, Validity::Undefined);
    }

    #[test]
    fn test_parse_unknown_ownertrust_and_validity_default() {
        let item = parse_trust_record("1:DEADBEEF12345678:1:::").unwrap();
        assert_eq!(item.owner_trust, OwnerTrust::Unknown);
        assert_eq!(item.validity, Validity::Unknown);
    }

    #[test]
    fn test_parse_non_trust_record_skipped() {
        assert!(parse_trust_record("tru::1:1400000000:0:3:1:5").is_none());
        assert!(parse_trust_record("gpg: checking the trustdb::::::").is_none());
    }

    #[test]
    fn test_parse_too_few_fields_skipped() {
        assert!(parse_trust_record("1:DEADBEEF:1").is_none());
        assert!(parse_trust_record("").is_none());
    }

    #[test]
    fn test_parse_empty_keyid_skipped() {
        assert!(parse_trust_record("1::1:f:u:name").is_none());
    }

    #[test]
    fn test_parse_unknown_type_code_skipped() {
        assert!(parse_trust_record("1:DEADBEEF12345678:9:f:u:name").is_none());
    }

    #[test]
    fn test_parse_garbage_input() {
        assert!(parse_trust_record("this is not engine output").is_none());
        assert!(parse_trust_record(":::::").is_none());
    }

    #[test]
    fn test_parse_name_with_extra_colons_truncated_at_field() {
        // gpg escapes ':' inside user IDs as \x3a, so field 6 is the
        // whole name; anything past it is trailing record padding.
        let item = parse_trust_record("1:DEADBEEF12345678:2:f:f:Bob <bob@example.net>::").unwrap();
        assert_eq!(item.name, "Bob <bob@example.net>");
    }
}
