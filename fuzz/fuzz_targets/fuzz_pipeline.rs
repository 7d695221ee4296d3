#![no_main]

use libfuzzer_sys::fuzz_target;
use nd_parser::parse;
use nd_render_gojs::{GoJsModel, project};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let parsed = parse(&input);
    let model = project(&parsed.net);

    assert_eq!(
        model.node_data_array.len(),
        parsed.net.nodes.len() + parsed.net.groups.len()
    );
    assert_eq!(model.link_data_array.len(), parsed.net.edges.len());

    if let Ok(json) = model.to_json() {
        let decoded: GoJsModel = serde_json::from_str(&json).expect("model decodes");
        assert_eq!(decoded, model);
    }
});
