//! Golden snapshot harness: rendered diagnostics plus the GoJS model for each
//! fixture under `tests/golden`. Run with `BLESS=1` to regenerate.

use nd_parser::parse;
use nd_render_gojs::project;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

const CASE_IDS: &[&str] = &[
    "topology_basic",
    "recovery_mixed",
    "unclosed_group",
    "keyword_case",
];

fn golden_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("golden")
}

fn normalize(text: &str) -> String {
    let mut normalized = text.replace("\r\n", "\n");
    if !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash = 0xcbf29ce484222325_u64;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn fnv_hex(value: &str) -> String {
    format!("{:016x}", fnv1a_64(value.as_bytes()))
}

fn render_case(input: &str) -> String {
    let parsed = parse(input);
    let model = project(&parsed.net);
    let json = model.to_json_pretty().expect("encode GoJS model");
    normalize(&format!(
        "{}\n\n{json}",
        parsed.rendered_diagnostics().join("\n")
    ))
}

fn run_case(case_id: &str, bless: bool) {
    let base = golden_dir();
    let input_path = base.join(format!("{case_id}.nd"));
    let expected_path = base.join(format!("{case_id}.expected"));

    let input = fs::read_to_string(&input_path)
        .unwrap_or_else(|err| panic!("failed reading {}: {err}", input_path.display()));
    let input = input.replace("\r\n", "\n");

    let start = Instant::now();
    let rendered = render_case(&input);
    let elapsed_ms = start.elapsed().as_millis();
    let output_hash = fnv_hex(&rendered);

    assert_eq!(
        rendered,
        render_case(&input),
        "determinism violation for case {case_id}"
    );

    if bless {
        fs::write(&expected_path, &rendered)
            .unwrap_or_else(|err| panic!("failed writing {}: {err}", expected_path.display()));
    }

    let expected = fs::read_to_string(&expected_path).unwrap_or_else(|err| {
        panic!(
            "missing golden snapshot {} ({err}). run with BLESS=1 to generate",
            expected_path.display()
        )
    });
    let expected = normalize(&expected);

    assert_eq!(
        output_hash,
        fnv_hex(&expected),
        "FNV hash mismatch for case {case_id}"
    );
    assert_eq!(
        rendered, expected,
        "golden snapshot content mismatch for case {case_id}"
    );

    let evidence = json!({
        "scenario_id": case_id,
        "input_hash": fnv_hex(&input),
        "elapsed_ms": elapsed_ms,
        "output_artifact_hash": output_hash,
        "pass_fail_reason": if bless { "bless-updated" } else { "matched-golden" },
    });
    println!("{evidence}");
}

#[test]
fn golden_snapshots_are_stable() {
    let bless = std::env::var("BLESS").is_ok_and(|v| v == "1");
    for case_id in CASE_IDS {
        run_case(case_id, bless);
    }
}
