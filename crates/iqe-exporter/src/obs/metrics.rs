//! Counter registry for the exporter.
//!
//! Counters are `f64` accumulators with dynamic labels backed by `DashMap`.
//! The value is stored as raw bits in an `AtomicU64` and updated with a
//! compare-and-swap loop, so concurrent adds to one series are never lost.
//! Labels are flattened into sorted key vectors to keep deterministic
//! ordering.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use iqe_core::protocol::RunCredits;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Sample value in exposition syntax.
fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        v.to_string()
    }
}

fn label_str(key: &[(String, String)]) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Stable identity of a metric family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDesc {
    pub namespace: &'static str,
    pub subsystem: &'static str,
    pub name: &'static str,
    pub help: &'static str,
}

impl MetricDesc {
    /// `namespace_subsystem_name`, skipping empty parts.
    pub fn fq_name(&self) -> String {
        [self.namespace, self.subsystem, self.name]
            .iter()
            .filter(|p| !p.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("_")
    }
}

pub struct CounterVec {
    desc: MetricDesc,
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    pub fn new(desc: MetricDesc) -> Self {
        Self { desc, map: DashMap::new() }
    }

    /// Increment by an arbitrary value.
    ///
    /// Negative and non-finite deltas are clamped to zero; the series is
    /// still created.
    pub fn add(&self, labels: &[(&str, &str)], v: f64) {
        let v = if v.is_finite() && v > 0.0 { v } else { 0.0 };

        let mut key: Vec<(String, String)> = labels.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        key.sort();

        let counter = self.map.entry(key).or_insert_with(|| AtomicU64::new(0f64.to_bits()));
        // closure always returns Some, so this cannot fail
        let _ = counter.fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
            Some((f64::from_bits(bits) + v).to_bits())
        });
    }

    #[cfg(test)]
    fn get(&self, labels: &[(&str, &str)]) -> Option<f64> {
        let mut key: Vec<(String, String)> = labels.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        key.sort();
        self.map.get(&key).map(|c| f64::from_bits(c.load(Ordering::Acquire)))
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, out: &mut String) {
        let name = self.desc.fq_name();
        let _ = writeln!(out, "# HELP {} {}", name, escape_help(self.desc.help));
        let _ = writeln!(out, "# TYPE {} counter", name);

        let mut rows: Vec<(Vec<(String, String)>, f64)> = self.map.iter()
            .map(|r| (r.key().clone(), f64::from_bits(r.value().load(Ordering::Acquire))))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, val) in rows {
            if key.is_empty() {
                let _ = writeln!(out, "{} {}", name, format_value(val));
            } else {
                let _ = writeln!(out, "{}{{{}}} {}", name, label_str(&key), format_value(val));
            }
        }
    }
}

const NAMESPACE: &str = "iqe";
const SUBSYSTEM: &str = "tests";

pub const TESTS_RAN: MetricDesc = MetricDesc {
    namespace: NAMESPACE,
    subsystem: SUBSYSTEM,
    name: "rans",
    help: "Running count of tests that have ran",
};
pub const TESTS_FAILED: MetricDesc = MetricDesc {
    namespace: NAMESPACE,
    subsystem: SUBSYSTEM,
    name: "failed",
    help: "Running count of tests that have failed",
};
pub const TESTS_SKIPPED: MetricDesc = MetricDesc {
    namespace: NAMESPACE,
    subsystem: SUBSYSTEM,
    name: "skipped",
    help: "Running count of tests that have been skipped",
};
pub const TESTS_ERRORED: MetricDesc = MetricDesc {
    namespace: NAMESPACE,
    subsystem: SUBSYSTEM,
    name: "errors",
    help: "Running count of tests that have errored",
};
pub const TESTS_TIME: MetricDesc = MetricDesc {
    namespace: NAMESPACE,
    subsystem: SUBSYSTEM,
    name: "time_seconds",
    help: "Running count of seconds that have executed",
};

const BUILD_INFO_HELP: &str =
    "A metric with a constant '1' value labeled by name and version of the running binary.";

/// Identity of the running binary, exposed as a constant `1` gauge.
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

impl BuildInfo {
    fn render(&self, out: &mut String) {
        let name = "iqe_build_info";
        let _ = writeln!(out, "# HELP {} {}", name, BUILD_INFO_HELP);
        let _ = writeln!(out, "# TYPE {} gauge", name);
        let _ = writeln!(
            out,
            "{}{{name=\"{}\",version=\"{}\"}} 1",
            name,
            escape_label(self.name),
            escape_label(self.version)
        );
    }
}

pub struct ExporterMetrics {
    pub tests_ran: CounterVec,
    pub tests_failed: CounterVec,
    pub tests_skipped: CounterVec,
    pub tests_errored: CounterVec,
    pub tests_time: CounterVec,
    build_info: BuildInfo,
}

impl Default for ExporterMetrics {
    fn default() -> Self {
        Self::new(BuildInfo::default())
    }
}

impl ExporterMetrics {
    pub fn new(build_info: BuildInfo) -> Self {
        Self {
            tests_ran: CounterVec::new(TESTS_RAN),
            tests_failed: CounterVec::new(TESTS_FAILED),
            tests_skipped: CounterVec::new(TESTS_SKIPPED),
            tests_errored: CounterVec::new(TESTS_ERRORED),
            tests_time: CounterVec::new(TESTS_TIME),
            build_info,
        }
    }

    /// Apply the five credits of one validated submission.
    ///
    /// Each add is atomic on its own; a concurrent scrape may see only some
    /// of the five.
    pub fn credit(&self, c: &RunCredits) {
        let labels = c.labels.pairs();
        self.tests_ran.add(&labels, c.ran);
        self.tests_failed.add(&labels, c.failed);
        self.tests_skipped.add(&labels, c.skipped);
        self.tests_errored.add(&labels, c.errored);
        self.tests_time.add(&labels, c.time_seconds);
    }

    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.tests_ran.render(&mut out);
        self.tests_failed.render(&mut out);
        self.tests_skipped.render(&mut out);
        self.tests_errored.render(&mut out);
        self.tests_time.render(&mut out);
        self.build_info.render(&mut out);
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use iqe_core::protocol::LabelTuple;

    fn credits(target_app: &str, ran: f64, time_seconds: f64) -> RunCredits {
        RunCredits {
            labels: LabelTuple::new("p", "high", target_app),
            ran,
            failed: 0.0,
            skipped: 0.0,
            errored: 0.0,
            time_seconds,
        }
    }

    #[test]
    fn fq_name_joins_parts() {
        assert_eq!(TESTS_RAN.fq_name(), "iqe_tests_rans");
        assert_eq!(TESTS_TIME.fq_name(), "iqe_tests_time_seconds");
        let bare = MetricDesc { namespace: "", subsystem: "", name: "up", help: "" };
        assert_eq!(bare.fq_name(), "up");
    }

    #[test]
    fn label_order_does_not_split_series() {
        let c = CounterVec::new(TESTS_RAN);
        c.add(&[("plugin", "p"), ("target_app", "a")], 2.0);
        c.add(&[("target_app", "a"), ("plugin", "p")], 3.0);
        assert_eq!(c.get(&[("plugin", "p"), ("target_app", "a")]), Some(5.0));
    }

    #[test]
    fn negative_and_nan_deltas_clamp_to_zero() {
        let c = CounterVec::new(TESTS_RAN);
        c.add(&[("plugin", "p")], 4.0);
        c.add(&[("plugin", "p")], -10.0);
        c.add(&[("plugin", "p")], f64::NAN);
        c.add(&[("plugin", "q")], -1.0);
        assert_eq!(c.get(&[("plugin", "p")]), Some(4.0));
        assert_eq!(c.get(&[("plugin", "q")]), Some(0.0));
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let c = std::sync::Arc::new(CounterVec::new(TESTS_TIME));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = c.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        c.add(&[("plugin", "p")], 1.0);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(c.get(&[("plugin", "p")]), Some(8000.0));
    }

    #[test]
    fn render_emits_help_type_and_sorted_series() {
        let m = ExporterMetrics::default();
        m.credit(&credits("b", 1.0, 0.5));
        m.credit(&credits("a", 5.0, 2.5));

        let out = m.render();
        let labels_a = r#"{plugin="p",priority="high",target_app="a"}"#;
        let labels_b = r#"{plugin="p",priority="high",target_app="b"}"#;
        assert!(out.contains("# HELP iqe_tests_rans Running count of tests that have ran\n"));
        assert!(out.contains("# TYPE iqe_tests_rans counter\n"));
        assert!(out.contains(&format!("iqe_tests_time_seconds{labels_a} 2.5\n")));

        let a = out.find(&format!("iqe_tests_rans{labels_a} 5\n")).unwrap();
        let b = out.find(&format!("iqe_tests_rans{labels_b} 1\n")).unwrap();
        assert!(a < b);
    }

    #[test]
    fn empty_registry_still_lists_families() {
        let out = ExporterMetrics::default().render();
        for d in [TESTS_RAN, TESTS_FAILED, TESTS_SKIPPED, TESTS_ERRORED, TESTS_TIME] {
            assert!(out.contains(&format!("# TYPE {} counter\n", d.fq_name())));
        }
        assert!(out.contains(&format!(
            "iqe_build_info{{name=\"iqe-exporter\",version=\"{}\"}} 1\n",
            env!("CARGO_PKG_VERSION")
        )));
    }

    #[test]
    fn label_values_are_escaped() {
        let m = ExporterMetrics::default();
        let mut c = credits("a", 1.0, 0.0);
        c.labels.plugin = "we\"ird\\\nname".to_string();
        m.credit(&c);
        assert!(m.render().contains("plugin=\"we\\\"ird\\\\\\nname\""));
    }

    #[test]
    fn format_value_handles_specials() {
        assert_eq!(format_value(5.0), "5");
        assert_eq!(format_value(0.01), "0.01");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_value(f64::NAN), "NaN");
    }
}
