use chrono::{DateTime, Datelike, Utc};

/// Inputs of the renderers that do not come from the image itself.
///
/// Rendering the same image with the same context yields identical bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub timestamp: DateTime<Utc>,
}

impl RenderContext {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    /// Notice placed at the top of every generated build description.
    pub fn info_header(&self) -> String {
        format!(
            "Copyright (c) {year} SUSE LLC

All modifications and additions to the file contributed by third parties
remain the property of their copyright owners, unless otherwise agreed
upon.

The content of THIS FILE IS AUTOGENERATED and should not be manually modified.
It is generated by bcigen.

Please submit bugfixes or comments via https://bugs.opensuse.org/",
            year = self.year()
        )
    }
}

/// Prefix every non-empty line of `text` with `prefix`.
pub(crate) fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                line.to_owned()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn header_carries_year() {
        let ctx = RenderContext::new(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert!(ctx.info_header().starts_with("Copyright (c) 2024 SUSE LLC"));
    }

    #[test]
    fn indent_skips_blank_lines() {
        assert_eq!(indent("a\n\nb", "# "), "# a\n\n# b");
    }
}
