//! Integration tests for parsing + evaluation

use std::rc::Rc;

use classad::{ClassAd, EvalOptions, Evaluator, Value};

fn eval(expr: &str, my: Option<&ClassAd>, target: Option<&ClassAd>) -> Value {
    let expr = classad::parse(expr).unwrap();
    Evaluator::new(&EvalOptions::default()).evaluate(&expr, my, target)
}

#[test]
fn test_scoped_reference_into_my() {
    let my = ClassAd::parse("a = 4").unwrap();
    assert_eq!(eval("my.a + 2", Some(&my), None), Value::Integer(6));
}

#[test]
fn test_three_valued_logic_through_ads() {
    let ad = ClassAd::parse(
        r#"[
            Known = true;
            Missing = NoSuchAttribute;
            Broken = 1 / 0;
            A = Missing && false;
            B = Missing || true;
            C = Missing && true;
            D = Broken || true;
            E = false && Broken;
            F = Missing =?= undefined;
            G = Broken =!= error
        ]"#,
    )
    .unwrap();

    assert_eq!(ad.evaluate_attr("A"), Value::Boolean(false));
    assert_eq!(ad.evaluate_attr("B"), Value::Boolean(true));
    assert_eq!(ad.evaluate_attr("C"), Value::Undefined);
    assert_eq!(ad.evaluate_attr("D"), Value::Error);
    assert_eq!(ad.evaluate_attr("E"), Value::Boolean(false));
    assert_eq!(ad.evaluate_attr("F"), Value::Boolean(true));
    assert_eq!(ad.evaluate_attr("G"), Value::Boolean(false));
}

#[test]
fn test_target_expressions_see_swapped_scopes() {
    let job = ClassAd::parse(r#"[ Owner = "alice"; Wanted = TARGET.Owner == Owner ]"#).unwrap();
    let machine = ClassAd::parse(r#"[ Owner = "bob"; Check = TARGET.Wanted ]"#).unwrap();

    // Check evaluates job.Wanted with the job as MY and the machine as TARGET
    assert_eq!(machine.evaluate_attr_against("Check", &job), Value::Boolean(false));

    let twin = ClassAd::parse(r#"[ Owner = "alice"; Check = TARGET.Wanted ]"#).unwrap();
    assert_eq!(twin.evaluate_attr_against("Check", &job), Value::Boolean(true));
}

#[test]
fn test_nested_records_and_parent_scope() {
    let ad = ClassAd::parse(
        r#"[
            Limit = 10;
            Slot = [ Limit = 4; Cpus = 2; Fits = Cpus <= Limit; Outer = PARENT.Limit ];
            FromRoot = Slot.Outer + .Limit
        ]"#,
    )
    .unwrap();

    assert_eq!(ad.evaluate_attr("FromRoot"), Value::Integer(20));
    let Value::ClassAd(slot) = ad.evaluate_attr("Slot") else {
        panic!("Expected nested ad");
    };
    assert_eq!(slot.len(), 4);
    assert_eq!(
        eval("Slot.Fits", Some(&ad), None),
        Value::Boolean(true)
    );
}

#[test]
fn test_cycles_and_depth_limit() {
    let ad = ClassAd::parse("[ a = b; b = c; c = a; chain = d1; d1 = d2; d2 = d3; d3 = 7 ]").unwrap();
    assert_eq!(ad.evaluate_attr("a"), Value::Error);

    let shallow = EvalOptions {
        max_depth: 2,
        ..EvalOptions::default()
    };
    assert_eq!(ad.evaluate_with(&shallow, "chain", None), Value::Error);
    assert_eq!(ad.evaluate_attr("chain"), Value::Integer(7));
}

#[test]
fn test_values_print_as_literals() {
    let ad = ClassAd::parse("[ l = { 1, 2.5, \"x\", undefined }; r = [ a = 1 ] ]").unwrap();
    assert_eq!(ad.evaluate_attr("l").to_string(), "{ 1, 2.5, \"x\", undefined }");
    assert_eq!(ad.evaluate_attr("r").to_string(), "[ a = 1 ]");
}

#[test]
fn test_values_build_ads() {
    let mut ad = ClassAd::new();
    ad.insert_value("Cpus", 4_i64).unwrap();
    ad.insert_value("Name", "slot1").unwrap();
    ad.insert_value("Tags", vec![Value::from("gpu"), Value::from("ssd")])
        .unwrap();
    let inner = ClassAd::parse("[ x = 1 ]").unwrap();
    ad.insert_value("Inner", Value::ClassAd(Rc::new(inner))).unwrap();

    assert_eq!(
        ad.to_string(),
        r#"[ Cpus = 4; Name = "slot1"; Tags = { "gpu", "ssd" }; Inner = [ x = 1 ] ]"#
    );
    assert!(ad.insert_value("true", 1_i64).is_err());
}

#[test]
fn test_case_insensitive_everything() {
    let ad = ClassAd::parse(r#"[ MEMORY = 1024; owner = "Alice" ]"#).unwrap();
    assert_eq!(
        eval(r#"my.memory / 2 == 512 && OWNER == "alice" && TOUPPER(Owner) =?= "ALICE""#, Some(&ad), None),
        Value::Boolean(true)
    );
    assert_eq!(eval(r#"Owner =?= "alice""#, Some(&ad), None), Value::Boolean(false));
}
