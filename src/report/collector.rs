use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, info, warn};

use crate::error::ParseError;
use crate::report::report_model::{
    Collection, FailureIndicator, SkippedFile, TestCaseResult, TestRunResult, TestSuiteResult,
    run_name,
};

/// Prefix a directory name must carry to count as a run directory.
pub const RUN_DIR_PREFIX: &str = "run";

/// File name CTest writes inside each run directory.
pub const RESULTS_FILE: &str = "results.xml";

// ============================================================================
// Collection — discover, parse, aggregate
// ============================================================================

/// Collect every `run*/results.xml` under `root` into totals and failure records.
///
/// Never fails: a file that cannot be read or parsed is recorded in
/// [`Collection::skipped_files`] and contributes nothing else.
pub fn collect_results(root: &Path) -> Collection {
    collect_from_files(discover_result_files(root))
}

/// Parse and aggregate an already-discovered file list, keeping its order.
///
/// Every path stays in [`Collection::files`], including ones that vanished
/// or failed to parse.
pub fn collect_from_files(files: Vec<PathBuf>) -> Collection {
    let mut collection = Collection::default();

    for path in &files {
        let outcome = parse_result_file(path).and_then(|run| {
            collection.absorb(&run)?;
            Ok(run.suites.len())
        });

        match outcome {
            Ok(suites) => {
                debug!(path = %path.display(), suites, "parsed result file");
            }
            Err(ParseError::Read(e)) if e.kind() == ErrorKind::NotFound => {
                // Removed between discovery and read
                debug!(path = %path.display(), "result file vanished, skipping");
                collection.skipped_files.push(SkippedFile {
                    path: path.clone(),
                    reason: "file no longer exists".to_string(),
                });
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable result file");
                collection.skipped_files.push(SkippedFile {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    collection.files = files;

    info!(
        files = collection.files.len(),
        skipped = collection.skipped_files.len(),
        tests = collection.totals.tests,
        failures = collection.failures.len(),
        "collected test results"
    );
    collection
}

/// List `root/run*/results.xml`, sorted lexicographically by path (`run10` sorts before `run2`).
pub fn discover_result_files(root: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(root = %root.display(), error = %e, "testing root not readable");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with(RUN_DIR_PREFIX)
        })
        .map(|entry| entry.path().join(RESULTS_FILE))
        .filter(|path| path.exists())
        .collect();

    files.sort();
    files
}

/// Read and parse one result file. The run name is taken from its parent directory.
pub fn parse_result_file(path: &Path) -> Result<TestRunResult, ParseError> {
    let bytes = fs::read(path)?;
    let xml = String::from_utf8(bytes).map_err(|_| ParseError::Encoding)?;
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(&xml);
    parse_run(&run_name(path), xml)
}

/// Parse JUnit XML text into a run.
///
/// A `<testsuites>` root contributes its direct `<testsuite>` children; any
/// other root element is treated as a single suite.
pub fn parse_run(run: &str, xml: &str) -> Result<TestRunResult, ParseError> {
    let root = parse_document(xml)?;

    let suites = if root.name == "testsuites" {
        root.children_named("testsuite")
            .map(to_suite)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        vec![to_suite(&root)?]
    };

    Ok(TestRunResult {
        run: run.to_string(),
        suites,
    })
}

fn to_suite(element: &Element) -> Result<TestSuiteResult, ParseError> {
    let cases = element
        .children_named("testcase")
        .map(|case| TestCaseResult {
            classname: case.attr_or("classname", "unknown"),
            name: case.attr_or("name", "unknown"),
            outcome: failure_indicator(case),
        })
        .collect();

    Ok(TestSuiteResult {
        name: element.attr_or("name", "unknown"),
        tests: element.counter("tests")?,
        failures: element.counter("failures")?,
        errors: element.counter("errors")?,
        skipped: element.counter("skipped")?,
        cases,
    })
}

/// First `<failure>` child wins; `<error>` is only consulted when there is none.
fn failure_indicator(case: &Element) -> Option<FailureIndicator> {
    if let Some(failure) = case.children_named("failure").next() {
        return Some(FailureIndicator::Failure {
            message: failure.attr_or("message", ""),
            details: failure.text.clone(),
        });
    }
    case.children_named("error")
        .next()
        .map(|error| FailureIndicator::Error {
            message: error.attr_or("message", ""),
            details: error.text.clone(),
        })
}

// ============================================================================
// Minimal element tree over quick-xml events
// ============================================================================

#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    /// Character data that appears before the first child element
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart) -> Result<Self, ParseError> {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| ParseError::Attribute(e.to_string()))?;
            let raw = std::str::from_utf8(&attr.value).map_err(|_| ParseError::Encoding)?;
            let value = unescape(&normalize_attribute(raw))
                .map_err(|e| ParseError::Attribute(e.to_string()))?
                .into_owned();
            attributes.push((String::from_utf8_lossy(attr.key.as_ref()).into_owned(), value));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            ..Self::default()
        })
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn attr_or(&self, key: &str, default: &str) -> String {
        self.attr(key).unwrap_or(default).to_string()
    }

    /// Integer counter attribute, 0 when absent.
    fn counter(&self, key: &str) -> Result<i64, ParseError> {
        match self.attr(key) {
            None => Ok(0),
            Some(raw) => raw.trim().parse().map_err(|_| ParseError::BadCounter {
                element: self.name.clone(),
                attribute: key.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn push_text(&mut self, text: &str) {
        if self.children.is_empty() {
            self.text.push_str(text);
        }
    }
}

/// Build the element tree for a whole document, rejecting anything a strict XML parser would.
fn parse_document(xml: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| ParseError::Syntax {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(ParseError::TrailingContent);
                }
                stack.push(Element::from_start(&start)?);
            }
            Event::Empty(start) => {
                if root.is_some() {
                    return Err(ParseError::TrailingContent);
                }
                let element = Element::from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(end) => {
                let found = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                let element = stack.pop().ok_or_else(|| ParseError::MismatchedTag {
                    expected: String::new(),
                    found: found.clone(),
                })?;
                if element.name != found {
                    return Err(ParseError::MismatchedTag {
                        expected: element.name,
                        found,
                    });
                }
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                let raw = std::str::from_utf8(&text).map_err(|_| ParseError::Encoding)?;
                let text = unescape(&normalize_line_ends(raw))
                    .map_err(|e| ParseError::Syntax {
                        position: reader.buffer_position() as u64,
                        message: e.to_string(),
                    })?
                    .into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.push_text(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(ParseError::TrailingContent),
                }
            }
            Event::CData(cdata) => {
                let bytes = cdata.into_inner();
                let text = normalize_line_ends(&String::from_utf8_lossy(&bytes));
                match stack.last_mut() {
                    Some(parent) => parent.push_text(&text),
                    None => return Err(ParseError::TrailingContent),
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::Unclosed(open.name));
    }
    root.ok_or(ParseError::NoRoot)
}

/// XML end-of-line handling: literal `\r\n` and lone `\r` become `\n`.
///
/// Applied to raw markup before unescaping, so `&#13;` still yields a carriage return.
fn normalize_line_ends(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

/// Attribute-value normalization: literal tabs and line ends become single spaces.
fn normalize_attribute(raw: &str) -> String {
    normalize_line_ends(raw).replace(['\n', '\t'], " ")
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}
