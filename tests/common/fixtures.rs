use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};

/// Write `xml` to `root/<run>/results.xml`, creating the run directory.
pub fn write_run(root: &Path, run: &str, xml: &str) {
    let dir = root.join(run);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("results.xml"), xml).unwrap();
}

/// Fixed render time so documents can be compared byte for byte.
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap()
}

/// Single suite, five tests, one failing case.
pub const ONE_FAILURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="ModelFixture" tests="5" failures="1" errors="0" skipped="0">
  <testcase classname="ModelFixture" name="Coil_Ctor"/>
  <testcase classname="ModelFixture" name="Coil_Clone"/>
  <testcase classname="ModelFixture" name="Pump_Ctor"/>
  <testcase classname="ModelFixture" name="Pump_Clone"/>
  <testcase classname="ModelFixture" name="HeatPump_Curves">
    <failure message="  Expected equality of these values  ">
      HeatPump_GTest.cpp:42
      Which is: 3
    </failure>
  </testcase>
</testsuite>
"#;

/// `<testsuites>` root with two suites, no failing cases.
pub const TWO_SUITES_PASSING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
  <testsuite name="Utilities" tests="3" failures="0" errors="0" skipped="1">
    <testcase classname="UUID" name="Create"/>
    <testcase classname="UUID" name="Compare"/>
    <testcase classname="UUID" name="Slow"><skipped/></testcase>
  </testsuite>
  <testsuite name="Modelica" tests="2">
    <testcase classname="ModelicaFile" name="Parse"/>
    <testcase classname="ModelicaFile" name="Visit"/>
  </testsuite>
</testsuites>
"#;

/// Truncated document: never closes its root.
pub const CORRUPT: &str = r#"<?xml version="1.0"?>
<testsuite name="Broken" tests="100" failures="50">
  <testcase classname="Broken" name="half">
    <failure message="never seen">
"#;

/// A single-suite document with one failing case and the given counters.
pub fn suite_with_failure(run_label: &str, tests: u32, failures: u32) -> String {
    format!(
        r#"<testsuite name="{run_label}" tests="{tests}" failures="{failures}" errors="0" skipped="0">
  <testcase classname="{run_label}" name="case">
    <failure message="boom">trace</failure>
  </testcase>
</testsuite>"#
    )
}
