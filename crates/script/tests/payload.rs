//! Whole-payload parses: shapes lifted from real minified script output.

use msgr_script::{parse_script, walk, Node};

fn count_calls(tree: &Node) -> usize {
    let mut n = 0;
    walk(tree, &mut |node| {
        if matches!(node, Node::Call { .. }) {
            n += 1;
        }
    });
    n
}

#[test]
fn minified_iife_payload() {
    let src = "(function(){var a=window,b=a.document;b&&a.setTimeout(function(){b.title=\"x\"},0)})();";
    let tree = parse_script(src).unwrap();
    assert!(count_calls(&tree) >= 2);
}

#[test]
fn dense_operator_soup() {
    let src = "var x=a>>>2&0xff|b<<4^~c,y=d===e?f:g,z=typeof h!==\"undefined\"&&!!h;";
    assert!(parse_script(src).is_ok());
}

#[test]
fn nested_callbacks_with_sync_calls() {
    let src = r#"
        q.then(function(t) {
            t.forEach(function(u) {
                LS.sp("verifyContactRowExists", [0, 7], U, U, "Bob", 0, 0, 0, true);
            });
            return LS.sp("deleteThenInsertThread", 100, 100, "hi", U, 0, 0, [0, 5], [0, 9]);
        }, function(e) { report(e); });
    "#;
    let tree = parse_script(src).unwrap();
    assert!(count_calls(&tree) >= 4);
}

#[test]
fn string_and_regex_heavy() {
    let src = r#"var re=/["'\\/]/g,s="é\x41\n",t='a"b',u=s.replace(re,"_");"#;
    assert!(parse_script(src).is_ok());
}

#[test]
fn sequence_expression_statements() {
    let src = "a=1,b=2,c=a+b;d=(e=3,e*2);";
    let Node::Program(body) = parse_script(src).unwrap() else { panic!("expected program") };
    assert_eq!(body.len(), 2);
}

#[test]
fn deeply_nested_arrays() {
    let src = "var v=[[0,1],[[2,[3]],4],[],[5,,6]];";
    assert!(parse_script(src).is_ok());
}
