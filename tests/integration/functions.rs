//! Integration tests for built-in functions used from inside ads

use classad::{ClassAd, EvalOptions, Value};

fn machine() -> ClassAd {
    ClassAd::parse(
        r#"[
            Name = "slot1@node7.example.org";
            Cpus = 6;
            Memory = 12000;
            Features = "gpu, ssd,infiniband";
            Loads = { 0.5, 1.25, 0.25 };
            Environment = "PATH=/bin;HOME=/home/slot1";
            Slot = splitSlotName(Name)[0];
            Host = splitSlotName(Name)[1];
            HasGpu = stringListMember("gpu", Features);
            Peak = max(Loads);
            Mean = avg(Loads);
            Quantized = quantize(Memory, { 1024, 4096, 16384 });
            Label = strcat(toUpper(Slot), "-", substr(Host, 0, 5));
            Env = envV1ToV2(Environment);
            Domain = regexps("^[^.]+\\.(.*)$", Host, "\\1");
            Safe = ifThenElse(isUndefined(Missing), "none", Missing);
            Pretty = unparse(Quantized)
        ]"#,
    )
    .unwrap()
}

#[test]
fn test_functions_inside_ad() {
    let ad = machine();

    assert_eq!(ad.evaluate_attr("Slot"), Value::from("slot1"));
    assert_eq!(ad.evaluate_attr("Host"), Value::from("node7.example.org"));
    assert_eq!(ad.evaluate_attr("HasGpu"), Value::Boolean(true));
    assert_eq!(ad.evaluate_attr("Peak"), Value::Real(1.25));
    assert_eq!(ad.evaluate_attr("Mean"), Value::Real(2.0 / 3.0));
    assert_eq!(ad.evaluate_attr("Quantized"), Value::Integer(16384));
    assert_eq!(ad.evaluate_attr("Label"), Value::from("SLOT1-node7"));
    assert_eq!(
        ad.evaluate_attr("Env"),
        Value::from("PATH=/bin HOME=/home/slot1")
    );
    assert_eq!(ad.evaluate_attr("Domain"), Value::from("example.org"));
    assert_eq!(ad.evaluate_attr("Safe"), Value::from("none"));
    assert_eq!(
        ad.evaluate_attr("Pretty"),
        Value::from("quantize(Memory, { 1024, 4096, 16384 })")
    );
}

#[test]
fn test_eval_of_constructed_expression() {
    let ad = machine();
    let expr = classad::parse(r#"eval(strcat("Cpus * ", "2"))"#).unwrap();
    assert_eq!(ad.evaluate_expr(&expr, None), Value::Integer(12));
}

#[test]
fn test_functions_against_target() {
    let ad = machine();
    let job = ClassAd::parse(
        r#"[ Wants = "SSD gpu"; Fits = stringListsIntersect(toLower(Wants), TARGET.Features, " ,") ]"#,
    )
    .unwrap();
    assert_eq!(job.evaluate_attr_against("Fits", &ad), Value::Boolean(true));
}

#[test]
fn test_options_configure_functions() {
    let options = configured_options();
    let ad = ClassAd::parse(
        r#"[ Owner = "alice"; Group = userMap("projects", Owner, "hep"); Home = userHome(Owner) ]"#,
    )
    .unwrap();
    assert_eq!(ad.evaluate_with(&options, "Group", None), Value::from("hep"));
    assert_eq!(ad.evaluate_with(&options, "Home", None), Value::from("/home/alice"));
    assert_eq!(ad.evaluate_attr("Group"), Value::Undefined);
}

fn configured_options() -> EvalOptions {
    let mut options = EvalOptions::default();
    options.user_maps.insert(
        "projects".to_string(),
        [("alice".to_string(), vec!["astro".to_string(), "hep".to_string()])].into(),
    );
    options
        .user_homes
        .insert("alice".to_string(), "/home/alice".to_string());
    options
}

#[test]
fn test_builtin_catalogue() {
    for name in ["strcat", "StringListIMember", "regexps", "formatTime", "mergeEnvironment"] {
        assert!(classad::eval::is_builtin(name), "{name} should be built in");
    }
    assert!(classad::eval::builtin_names().len() >= 50);
}
