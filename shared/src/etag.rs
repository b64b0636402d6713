/// Weak ETag for a pre-serialized payload. Stable across restarts for the
/// same bytes, cheap enough to compute once at load time.
pub fn weak_etag(bytes: &[u8]) -> String {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(bytes);
    format!("W/\"{:08x}-{}\"", hasher.finalize(), bytes.len())
}

#[cfg(test)]
mod tests {
    use super::weak_etag;

    #[test]
    fn etag_is_deterministic_and_length_tagged() {
        let a = weak_etag(b"[]");
        let b = weak_etag(b"[]");
        assert_eq!(a, b);
        assert!(a.starts_with("W/\""));
        assert!(a.ends_with("-2\""));
    }

    #[test]
    fn different_payloads_get_different_etags() {
        assert_ne!(weak_etag(b"[]"), weak_etag(b"[{}]"));
    }
}
