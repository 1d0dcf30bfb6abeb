//! End-to-end extraction tests over whole contract sources.

use solscope_core::{extract, signature, strip_comments, Mutability, TypeDescriptor};

#[test]
fn basic_contract_end_to_end() {
    let src = r#"
contract C {
    mapping(address => uint256) public balances;
    function add(uint256 a, uint256 b) public pure returns (uint256) {}
    function secretive() private view returns (uint256) {}
}
"#;
    let result = extract(src);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let names: Vec<&str> = result
        .declarations
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(names, vec!["balances", "add"]);

    let balances = &result.declarations[0];
    assert_eq!(balances.inputs.len(), 1);
    assert_eq!(balances.inputs[0].name, "key1");
    assert_eq!(
        balances.inputs[0].ty,
        TypeDescriptor::Primitive("address".to_owned())
    );
    assert_eq!(balances.outputs.len(), 1);
    assert_eq!(balances.outputs[0].name, "value");
    assert_eq!(
        balances.outputs[0].ty,
        TypeDescriptor::Primitive("uint256".to_owned())
    );
    assert_eq!(balances.mutability, Mutability::View);

    let add = &result.declarations[1];
    assert_eq!(add.mutability, Mutability::Pure);
    assert_eq!(add.inputs.len(), 2);
    assert_eq!(add.inputs[1].name, "b");
    assert_eq!(add.outputs.len(), 1);
    assert_eq!(add.outputs[0].name, "");
    assert_eq!(
        add.outputs[0].ty,
        TypeDescriptor::Primitive("uint256".to_owned())
    );
}

#[test]
fn unresolved_mapping_value_reports_and_drops() {
    let result = extract("contract C { mapping(address => Foo) public data; }");
    assert!(result.declarations.is_empty());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].subject, "data");
    assert_eq!(result.diagnostics[0].missing_type, "Foo");
}

#[test]
fn redeclared_variable_deduplicated() {
    let result = extract("contract C { uint256 public value; uint256 public value; }");
    assert_eq!(result.declarations.len(), 1);
    assert_eq!(result.declarations[0].name, "value");
}

#[test]
fn struct_and_enum_resolution_through_getter() {
    let src = r#"
contract Registry {
    enum Status { Active, Inactive }
    struct User {
        address addr;
        Status status;
    }
    mapping(address => User) public users;
    User public admin;
}
"#;
    let result = extract(src);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.declarations.len(), 2);

    for decl in &result.declarations {
        let TypeDescriptor::Tuple(components) = &decl.outputs[0].ty else {
            panic!("expected tuple output for {}", decl.name);
        };
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].name, "addr");
        assert_eq!(
            components[1].ty,
            TypeDescriptor::Primitive("uint8".to_owned())
        );
    }

    let item = &result.abi_items[0];
    let json = serde_json::to_value(item).unwrap();
    assert_eq!(json["outputs"][0]["type"], "tuple");
    assert_eq!(json["outputs"][0]["components"][1]["type"], "uint8");
    // the declaration keeps the source name for display
    assert_eq!(result.declarations[0].outputs[0].source_type, "User");
}

#[test]
fn nested_struct_expansion() {
    let src = r#"
contract C {
    struct Inner { uint256 value; }
    struct Outer { Inner data; bool flag; }
    Outer public config;
}
"#;
    let result = extract(src);
    assert!(result.diagnostics.is_empty());
    let TypeDescriptor::Tuple(outer) = &result.declarations[0].outputs[0].ty else {
        panic!("expected tuple");
    };
    assert_eq!(outer[0].name, "data");
    let TypeDescriptor::Tuple(inner) = &outer[0].ty else {
        panic!("expected nested tuple");
    };
    assert_eq!(inner[0].name, "value");
    assert_eq!(outer[1].ty, TypeDescriptor::Primitive("bool".to_owned()));
}

#[test]
fn cyclic_structs_surface_as_diagnostics() {
    let src = r#"
contract C {
    struct A { B b; }
    struct B { A a; }
    A public root;
}
"#;
    let result = extract(src);
    assert!(result.declarations.is_empty());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].subject, "root");
}

#[test]
fn qualified_names_and_aliases() {
    let src = r#"
contract Vault {
    type Shares is uint128;
    struct Position { Shares amount; address owner; }
    mapping(address => Vault.Position) public positions;
    function quote(Shares amount) public view returns (Shares) { return amount; }
}
"#;
    let result = extract(src);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let names: Vec<&str> = result
        .declarations
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(names, vec!["positions", "quote"]);

    let TypeDescriptor::Tuple(pos) = &result.declarations[0].outputs[0].ty else {
        panic!("expected tuple");
    };
    assert_eq!(pos[0].ty, TypeDescriptor::Primitive("uint128".to_owned()));
    assert_eq!(
        result.declarations[1].inputs[0].ty,
        TypeDescriptor::Primitive("uint128".to_owned())
    );
}

#[test]
fn nested_mapping_getter_with_final_value() {
    let src = r#"
contract C {
    mapping(uint256 => mapping(address => mapping(bytes32 => bool))) public flags;
}
"#;
    let result = extract(src);
    assert_eq!(result.declarations.len(), 1);
    let d = &result.declarations[0];
    let input_types: Vec<&TypeDescriptor> = d.inputs.iter().map(|p| &p.ty).collect();
    assert_eq!(
        input_types,
        vec![
            &TypeDescriptor::Primitive("uint256".to_owned()),
            &TypeDescriptor::Primitive("address".to_owned()),
            &TypeDescriptor::Primitive("bytes32".to_owned()),
        ]
    );
    assert_eq!(d.outputs[0].ty, TypeDescriptor::Primitive("bool".to_owned()));
    assert_eq!(signature(d), "flags(uint256,address,bytes32)");
}

#[test]
fn strip_is_idempotent_and_line_preserving() {
    let src = "contract C { // trailing\n/* block\nspan */ uint256 public x;\n}";
    let once = strip_comments(src);
    assert_eq!(strip_comments(&once), once);
    assert_eq!(once.matches('\n').count(), src.matches('\n').count());
}

#[test]
fn commented_out_declarations_ignored() {
    let src = r#"
contract C {
    // mapping(address => uint256) public ghost;
    /*
    function phantom() public view returns (uint256) {}
    */
    uint256 public real;
}
"#;
    let result = extract(src);
    let names: Vec<&str> = result
        .declarations
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(names, vec!["real"]);
}

#[test]
fn fully_unparseable_input_yields_empty_result() {
    let result = extract("@#$%^&*()!");
    assert!(result.declarations.is_empty());
    assert!(result.abi_items.is_empty());
    assert!(result.diagnostics.is_empty());
}

#[test]
fn realistic_token_contract() {
    let src = r#"
// SPDX-License-Identifier: MIT
pragma solidity ^0.8.20;

contract Token {
    string public name = "Example";
    string public symbol = "EXM";
    uint8 public decimals = 18;
    uint256 public totalSupply;
    address public owner;

    mapping(address => uint256) public balanceOf;
    mapping(address => mapping(address => uint256)) public allowance;

    function transfer(address to, uint256 amount) public returns (bool) {
        balanceOf[msg.sender] -= amount;
        balanceOf[to] += amount;
        return true;
    }

    function circulating() public view returns (uint256 supply) {
        return totalSupply;
    }
}
"#;
    let result = extract(src);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let names: Vec<&str> = result
        .declarations
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "name",
            "symbol",
            "decimals",
            "totalSupply",
            "owner",
            "balanceOf",
            "allowance",
            "circulating"
        ]
    );

    let allowance = result
        .declarations
        .iter()
        .find(|d| d.name == "allowance")
        .unwrap();
    assert_eq!(allowance.inputs.len(), 2);
    assert_eq!(signature(allowance), "allowance(address,address)");

    let circulating = result
        .declarations
        .iter()
        .find(|d| d.name == "circulating")
        .unwrap();
    assert_eq!(circulating.outputs[0].name, "supply");
}
