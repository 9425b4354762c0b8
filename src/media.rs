use super::*;

#[derive(Debug, PartialEq, Copy, Clone)]
pub(crate) enum Media {
  Audio,
  Code,
  Iframe,
  Image,
  Markdown,
  Pdf,
  Text,
  Unknown,
  Video,
}

impl Media {
  #[rustfmt::skip]
  const TABLE: &'static [(&'static str, Media, &'static [&'static str])] = &[
    ("application/json",          Media::Code,     &["json"]),
    ("application/pdf",           Media::Pdf,      &["pdf"]),
    ("audio/mpeg",                Media::Audio,    &["mp3"]),
    ("audio/wav",                 Media::Audio,    &["wav"]),
    ("image/gif",                 Media::Image,    &["gif"]),
    ("image/jpeg",                Media::Image,    &["jpg", "jpeg"]),
    ("image/png",                 Media::Image,    &["png"]),
    ("image/svg+xml",             Media::Iframe,   &["svg"]),
    ("image/webp",                Media::Image,    &["webp"]),
    ("text/css",                  Media::Code,     &["css"]),
    ("text/html",                 Media::Iframe,   &["html", "htm"]),
    ("text/javascript",           Media::Code,     &["js"]),
    ("text/markdown",             Media::Markdown, &["md"]),
    ("text/plain",                Media::Text,     &["txt"]),
    ("video/mp4",                 Media::Video,    &["mp4"]),
    ("video/webm",                Media::Video,    &["webm"]),
  ];

  pub(crate) fn from_content_type(content_type: &str) -> Media {
    for (entry, media, _) in Self::TABLE {
      if *entry == Self::essence(content_type) {
        return *media;
      }
    }

    Media::Unknown
  }

  /// Extension the artifact file is written with. The same table backs
  /// `content_type_for_extension` so lookup and writing agree on filenames.
  pub(crate) fn extension(content_type: &str) -> &'static str {
    for (entry, _, extensions) in Self::TABLE {
      if *entry == Self::essence(content_type) {
        if let Some(extension) = extensions.first() {
          return extension;
        }
      }
    }

    "bin"
  }

  pub(crate) fn content_type_for_extension(extension: &str) -> &'static str {
    let extension = extension.to_lowercase();

    for (content_type, _, extensions) in Self::TABLE {
      if extensions.contains(&extension.as_str()) {
        return content_type;
      }
    }

    "application/octet-stream"
  }

  fn essence(content_type: &str) -> &str {
    content_type
      .split(';')
      .next()
      .unwrap_or_default()
      .trim()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extension_for_content_type() {
    assert_eq!(Media::extension("image/png"), "png");
    assert_eq!(Media::extension("text/html"), "html");
    assert_eq!(Media::extension("text/plain;charset=utf-8"), "txt");
    assert_eq!(Media::extension("application/x-unknown"), "bin");
  }

  #[test]
  fn content_type_for_extension() {
    assert_eq!(Media::content_type_for_extension("png"), "image/png");
    assert_eq!(Media::content_type_for_extension("PNG"), "image/png");
    assert_eq!(Media::content_type_for_extension("jpeg"), "image/jpeg");
    assert_eq!(
      Media::content_type_for_extension("zzz"),
      "application/octet-stream"
    );
  }

  #[test]
  fn recursive_media() {
    assert_eq!(Media::from_content_type("text/html"), Media::Iframe);
    assert_eq!(
      Media::from_content_type("text/html;charset=utf-8"),
      Media::Iframe
    );
    assert_eq!(Media::from_content_type("image/svg+xml"), Media::Iframe);
    assert_eq!(Media::from_content_type("image/png"), Media::Image);
    assert_eq!(Media::from_content_type("application/cbor"), Media::Unknown);
  }
}
