use warehouse_replay::{
    parse_facts, parse_plan, GridSymbols, Renderer, Replay, WitnessSelector,
};

const FACTS: &str = "\
init(object(node,1),value(at,pair(1,1))).
init(object(node,2),value(at,pair(2,1))).
init(object(node,3),value(at,pair(1,2))).
init(object(node,4),value(at,pair(2,2))).
init(object(highway,4),value(at,pair(2,2))).
init(object(pickingStation,1),value(at,pair(2,1))).
init(object(robot,1),value(at,pair(1,1))).
init(object(shelf,1),value(at,pair(1,1))).
init(object(product,1),value(on,pair(1,2))).
init(object(order,1),value(pickingStation,1)).
init(object(order,1),value(line,pair(1,1))).
";

const PLAN: &str = r#"{"Call":[{"Witnesses":[{"Value":[
    "occurs(object(robot,1),pickup,1)",
    "occurs(object(robot,1),move(1,0),2)",
    "occurs(object(robot,1),deliver(1,1,1),3)"
]}]}]}"#;

fn render_all() -> (Vec<String>, String) {
    let facts = parse_facts(FACTS).unwrap();
    let loaded = parse_plan(PLAN, WitnessSelector::First).unwrap();

    let mut renderer = Renderer::new(GridSymbols::default(), facts.bounds);
    for frame in Replay::new(facts.state.clone(), &loaded.plan) {
        renderer.fit(&frame.state);
    }

    let mut texts = Vec::new();
    let mut last = None;
    for frame in Replay::new(facts.state, &loaded.plan) {
        texts.push(renderer.render_frame(&frame));
        last = Some((frame.time, frame.state));
    }
    let (time, state) = last.unwrap();
    (texts, renderer.final_summary(&state, time))
}

#[test]
fn width_is_fixed_across_frames() {
    let (texts, _) = render_all();
    assert_eq!(texts.len(), 4);
    // R1[S1] is six characters wide; every frame uses that width.
    for text in &texts {
        assert!(text.contains("┌──────┬──────┐"), "{text}");
    }
}

#[test]
fn initial_frame_layout() {
    let (texts, _) = render_all();
    let expected = "\
--- Time: 0 ---
┌──────┬──────┐
│R1    │P1    │
├──────┼──────┤
│.     │#     │
└──────┴──────┘

Shelf Quantities:
  Shelf 1: Product 1: Qty 2

Order Requirements:
  Order 1 (at P1) Req: Product 1: Qty 1
";
    assert_eq!(texts[0], expected);
}

#[test]
fn delivery_frame_reports_action_and_fulfilment() {
    let (texts, summary) = render_all();
    let delivered = &texts[3];
    assert!(delivered.starts_with("--- Time: 3 ---\n"));
    assert!(delivered.contains("│.     │R1[S1]│"), "{delivered}");
    assert!(delivered.contains(
        "Actions Occurring:\n  Robot 1: deliver (Order: 1, Product: 1, Units: 1)\n"
    ));
    assert!(delivered.contains("  Shelf 1: Product 1: Qty 1"));
    assert!(delivered.contains("  All defined orders fulfilled!"));

    assert!(summary.contains("--- Simulation Complete (Reached Time 3) ---"));
    assert!(summary.contains("Final Order Requirements:\n  All defined orders fulfilled!"));
}
