//! Small utility helpers used across modules.

const FNV1A32_OFFSET: u32 = 0x811c_9dc5;
const FNV1A32_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over the UTF-8 bytes of `input`.
/// Stable across platforms and releases; seeded orderings depend on it.
pub fn fnv1a32(input: &str) -> u32 {
  let mut hash = FNV1A32_OFFSET;
  for byte in input.as_bytes() {
    hash ^= *byte as u32;
    hash = hash.wrapping_mul(FNV1A32_PRIME);
  }
  hash
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with whole specification documents.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}
