use super::*;

lazy_static! {
  pub(crate) static ref CONTENT_REFERENCE: Regex =
    Regex::new(r"(?i)/content/([0-9a-f]{64}i[0-9]+)").unwrap();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn content_reference() {
    let haystack = format!("<img src=\"/content/{}i0\">", "a".repeat(64));
    let capture = CONTENT_REFERENCE.captures(&haystack).unwrap();

    assert_eq!(&capture[1], format!("{}i0", "a".repeat(64)));

    assert!(CONTENT_REFERENCE.is_match(&format!("/CONTENT/{}I2", "A".repeat(64))));

    assert!(!CONTENT_REFERENCE.is_match(&format!("/content/{}i0", "a".repeat(63))));
    assert!(!CONTENT_REFERENCE.is_match(&format!("/content/{}", "a".repeat(64))));
  }
}
