//! Browser tests for the wasm-bindgen surface.
//!
//! Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use squirrel_wasm::SquirrelWorldWasm;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn sample_world_ticks() {
    let Ok(mut world) = SquirrelWorldWasm::sample(JsValue::UNDEFINED) else {
        panic!("sample world should build");
    };
    assert!(!world.is_airborne());

    let Ok(frame) = world.tick(1.0, 0.0, false) else {
        panic!("tick should serialize a frame");
    };
    assert!(frame.is_object());
    assert_eq!(world.tick_count(), 1.0);

    assert!(world.tick(0.0, -1.0, true).is_ok());
    assert!(world.is_airborne());
}

#[wasm_bindgen_test]
fn edge_segments_are_flat_fives() {
    let Ok(world) = SquirrelWorldWasm::sample(JsValue::NULL) else {
        panic!("sample world should build");
    };
    assert_eq!(world.edge_segments().length(), 10 * 5);
    assert_eq!(world.vertex_positions().length(), 8 * 2);
    assert_eq!(world.get_bounds().len(), 4);
}

#[wasm_bindgen_test]
fn degenerate_edges_are_rejected() {
    let edges = js_sys::JSON::parse(r#"[{"start":[5,5],"end":[5,5]}]"#).unwrap();
    assert!(SquirrelWorldWasm::new(edges, JsValue::UNDEFINED, 0.0, 0.0).is_err());
}

#[wasm_bindgen_test]
fn partial_config_is_accepted() {
    let edges = js_sys::JSON::parse(r#"[{"start":[0,0],"end":[100,0],"ground":true}]"#).unwrap();
    let config = js_sys::JSON::parse(r#"{"gravity":0.5,"standoffTicks":3}"#).unwrap();
    let Ok(world) = SquirrelWorldWasm::new(edges, config, 10.0, 5.0) else {
        panic!("partial config should deserialize");
    };
    assert_eq!(world.position_x(), 10.0);
    assert_eq!(world.position_y(), 0.0);
}

#[wasm_bindgen_test]
fn non_finite_respawn_is_refused() {
    let Ok(mut world) = SquirrelWorldWasm::sample(JsValue::UNDEFINED) else {
        panic!("sample world should build");
    };
    let (x, y) = (world.position_x(), world.position_y());

    assert!(world.respawn(f64::NAN, 10.0).is_err());
    assert_eq!(world.position_x(), x);
    assert_eq!(world.position_y(), y);
    assert!(world.respawn(300.0, 200.0).is_ok());
}

#[wasm_bindgen_test]
fn non_finite_spawn_is_rejected() {
    let edges = js_sys::JSON::parse(r#"[{"start":[0,0],"end":[100,0]}]"#).unwrap();
    assert!(SquirrelWorldWasm::new(edges, JsValue::UNDEFINED, f64::NAN, 0.0).is_err());
}
