//! Test specification parsing: pull ordered sections, their shuffle/select
//! directives and item references out of a QTI-style test document.
//!
//! Both QTI 2.x (`assessmentSection`, `ordering`, `selection`,
//! `assessmentItemRef`) and QTI 3.0 (`qti-assessment-section`, ...) spellings
//! are accepted. Sections are reported flat, in document order; a section's
//! body runs until the next section opens, so directives and item refs belong
//! to the nearest preceding section.
//!
//! Finding no sections is not an error here. The selector decides what an
//! empty section list means.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, error, instrument, warn};

use crate::domain::TestSection;
use crate::error::SelectionError;
use crate::util::trunc_for_log;

/// Non-fatal findings. Each one is also logged at WARN.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseWarning {
  /// `select` was non-numeric or not positive; the section has no cap.
  InvalidSelect { section_index: usize, value: String },
  /// An item reference carried no identifier and was skipped.
  ItemRefWithoutIdentifier { section_index: usize },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestDocument {
  /// Identifier of the enclosing test element, when present.
  pub identifier: Option<String>,
  pub sections: Vec<TestSection>,
  pub warnings: Vec<ParseWarning>,
}

/// Comments and CDATA blocks are removed before any tag is matched.
fn ignored_span_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->|<!\[CDATA\[.*?\]\]>").expect("comment regex must compile"))
}

fn test_open_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r#"<(?:qti-assessment-test|assessmentTest)(\s(?:[^>"']|"[^"]*"|'[^']*')*)?>"#).expect("test regex must compile")
  })
}

fn section_open_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r#"<(?:qti-assessment-section|assessmentSection)(\s(?:[^>"']|"[^"]*"|'[^']*')*)?>"#).expect("section regex must compile")
  })
}

fn ordering_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r#"<(?:qti-ordering|ordering)(\s(?:[^>"']|"[^"]*"|'[^']*')*)?>"#).expect("ordering regex must compile"))
}

fn selection_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r#"<(?:qti-selection|selection)(\s(?:[^>"']|"[^"]*"|'[^']*')*)?>"#).expect("selection regex must compile"))
}

fn item_ref_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r#"<(?:qti-assessment-item-ref|assessmentItemRef)(\s(?:[^>"']|"[^"]*"|'[^']*')*)?>"#).expect("item-ref regex must compile")
  })
}

fn attribute_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("attribute regex must compile")
  })
}

/// Value of attribute `name` inside a tag's attribute text. Empty values count as absent.
fn attribute(attrs: &str, name: &str) -> Option<String> {
  attribute_re()
    .captures_iter(attrs)
    .find(|c| &c[1] == name)
    .and_then(|c| c.get(2).or_else(|| c.get(3)))
    .map(|m| m.as_str().trim().to_string())
    .filter(|v| !v.is_empty())
}

/// Attribute text of the first match of `re` in `body`.
fn first_tag_attrs<'a>(re: &Regex, body: &'a str) -> Option<&'a str> {
  re.captures(body).map(|c| c.get(1).map_or("", |m| m.as_str()))
}

/// Parse the ordered section list. This is the common entry point; use
/// [`parse_document`] to also get the test identifier and warnings.
pub fn parse_sections(spec_text: &str) -> Result<Vec<TestSection>, SelectionError> {
  parse_document(spec_text).map(|doc| doc.sections)
}

#[instrument(level = "debug", skip(spec_text), fields(spec_len = spec_text.len()))]
pub fn parse_document(spec_text: &str) -> Result<TestDocument, SelectionError> {
  let stripped = ignored_span_re().replace_all(spec_text, "");
  let spec_text: &str = &stripped;

  let identifier = first_tag_attrs(test_open_re(), spec_text).and_then(|attrs| attribute(attrs, "identifier"));

  let opens: Vec<(usize, usize, &str)> = section_open_re()
    .captures_iter(spec_text)
    .filter_map(|c| {
      let whole = c.get(0)?;
      Some((whole.start(), whole.end(), c.get(1).map_or("", |m| m.as_str())))
    })
    .collect();

  let mut sections = Vec::with_capacity(opens.len());
  let mut warnings = Vec::new();

  for (index, &(_, body_start, attrs)) in opens.iter().enumerate() {
    let body_end = opens.get(index + 1).map_or(spec_text.len(), |next| next.0);
    let body = &spec_text[body_start..body_end];

    let section_id = attribute(attrs, "identifier");

    let shuffle = first_tag_attrs(ordering_re(), body)
      .and_then(|a| attribute(a, "shuffle"))
      .map(|v| v.eq_ignore_ascii_case("true"))
      .unwrap_or(false);

    let select_count = match first_tag_attrs(selection_re(), body).and_then(|a| attribute(a, "select")) {
      None => None,
      Some(raw) => match raw.parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
          warn!(target: "selection", section_index = index, section = ?section_id, value = %trunc_for_log(&raw, 40), "Ignoring invalid select directive; section is uncapped");
          warnings.push(ParseWarning::InvalidSelect { section_index: index, value: raw });
          None
        }
      },
    };

    let mut item_refs = Vec::new();
    for c in item_ref_re().captures_iter(body) {
      match c.get(1).and_then(|m| attribute(m.as_str(), "identifier")) {
        Some(id) => item_refs.push(id),
        None => {
          warn!(target: "selection", section_index = index, section = ?section_id, "Skipping item ref without identifier");
          warnings.push(ParseWarning::ItemRefWithoutIdentifier { section_index: index });
        }
      }
    }

    if shuffle && section_id.is_none() {
      error!(target: "selection", section_index = index, "Shuffled section has no identifier to seed its order");
      return Err(SelectionError::MissingSectionIdentifier { section_index: index });
    }

    debug!(target: "selection", section_index = index, section = ?section_id, shuffle, select = ?select_count, items = item_refs.len(), "Parsed section");
    sections.push(TestSection { identifier: section_id, shuffle, select_count, item_refs });
  }

  if sections.is_empty() {
    debug!(target: "selection", head = %trunc_for_log(spec_text.trim_start(), 120), "No sections found in specification");
  }

  Ok(TestDocument { identifier, sections, warnings })
}
