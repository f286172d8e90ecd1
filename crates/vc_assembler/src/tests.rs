//! Behavior of derived types across categories.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use crate::assembler::Structure;
use crate::de::StructDeserializer;
use crate::enumeration::Enumeration;
use crate::error::ErrorKind;
use crate::ser::StructSerializer;
use crate::tree::{ArrayNode, Node, StructNode};
use crate::{Assemble, AssembleEnum, ObjectAssembler, field_id};

#[derive(Debug, Default, Clone, PartialEq, AssembleEnum)]
enum Quality {
    #[default]
    Low,
    Medium,
    #[assemble(rename = "ultra")]
    High,
}

#[derive(Debug, Default, Clone, PartialEq, Assemble)]
struct Base {
    id: u32,
    tag: String,
}

#[derive(Debug, Default, PartialEq, Assemble)]
struct Derived {
    #[assemble(extend)]
    base: Base,
    #[assemble(rename = "display-name")]
    name: String,
    #[assemble(skip)]
    cache: Vec<u8>,
    quality: Quality,
}

#[derive(Debug, Default, PartialEq, Assemble)]
struct Marker {}

#[derive(Debug, Default, PartialEq, Assemble)]
struct Marked {
    first: Marker,
    second: Marker,
    value: u32,
}

#[derive(Debug, Default, PartialEq, Assemble)]
struct Shadowing {
    #[assemble(extend)]
    base: Base,
    id: u32,
}

#[derive(Debug, Default, PartialEq, Assemble)]
struct Doubled {
    #[assemble(extend)]
    left: Base,
    #[assemble(extend)]
    right: Base,
}

#[derive(Debug, Default, PartialEq, Assemble)]
struct Wrapper<T> {
    inner: T,
    count: u8,
}

#[derive(Debug, Default, PartialEq, Assemble)]
struct Tree {
    value: i32,
    children: Vec<Tree>,
    parent: Option<Box<Tree>>,
}

#[derive(Debug, Default, PartialEq, Assemble)]
struct Optionals {
    flag: Option<bool>,
    text: Option<String>,
    base: Option<Base>,
    list: Option<Vec<u16>>,
    quality: Option<Quality>,
    pair: Option<(i8, f32)>,
}

#[derive(Debug, Default, PartialEq, Assemble)]
struct Catalog {
    entries: BTreeMap<String, Base>,
}

fn derived() -> Derived {
    Derived {
        base: Base {
            id: 9,
            tag: "core".into(),
        },
        name: "primary".into(),
        cache: vec![1, 2, 3],
        quality: Quality::High,
    }
}

#[test]
fn extended_members_are_flattened() {
    let mut sink = StructNode::new();
    ObjectAssembler::serialize(&mut sink, &derived()).unwrap();

    let names: Vec<_> = sink.names().collect();
    assert_eq!(names, ["id", "tag", "display-name", "quality"]);
    assert_eq!(sink.get("quality"), Some(&Node::Str("ultra".into())));

    let mut back = Derived::default();
    ObjectAssembler::deserialize(&mut sink, &mut back).unwrap();
    assert_eq!(back.base, derived().base);
    assert_eq!(back.name, "primary");
    assert_eq!(back.quality, Quality::High);
}

#[test]
fn skipped_fields_are_untouched() {
    let mut sink = StructNode::new();
    ObjectAssembler::serialize(&mut sink, &derived()).unwrap();
    sink.insert("cache", Node::Array(ArrayNode::from(vec![Node::UInt(7)])));

    let mut back = Derived {
        cache: vec![42],
        ..Derived::default()
    };
    ObjectAssembler::deserialize(&mut sink, &mut back).unwrap();
    assert_eq!(back.cache, [42]);

    let descriptors = Derived::descriptors().unwrap();
    assert!(descriptors.get("cache").is_none());
    assert!(descriptors.get("base").is_some());
    assert_eq!(descriptors.len(), 3);
}

#[test]
fn extended_member_is_selectable_by_field() {
    let mut sink = StructNode::new();
    ObjectAssembler::serialize_partial(&mut sink, &derived(), &[field_id!(Derived, base)])
        .unwrap();
    let names: Vec<_> = sink.names().collect();
    assert_eq!(names, ["id", "tag"]);
}

#[test]
fn zero_sized_fields_are_distinct_members() {
    assert_ne!(field_id!(Marked, first), field_id!(Marked, second));

    let descriptors = Marked::descriptors().unwrap();
    assert_eq!(descriptors.len(), 3);
    let second = descriptors.find(&field_id!(Marked, second)).unwrap();
    assert_eq!(second.name(), "second");

    let mut sink = StructNode::new();
    let marked = Marked {
        value: 4,
        ..Marked::default()
    };
    ObjectAssembler::serialize(&mut sink, &marked).unwrap();
    assert_eq!(sink.names().collect::<Vec<_>>(), ["first", "second", "value"]);
}

#[test]
fn flattened_names_must_be_unique() {
    let err = Shadowing::descriptors().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Declaration(_)));
    assert!(err.to_string().contains("write `id`"));

    let err = Doubled::descriptors().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Declaration(_)));

    let mut sink = StructNode::new();
    assert!(ObjectAssembler::serialize(&mut sink, &Shadowing::default()).is_err());
    assert!(sink.is_empty());
}

#[test]
fn generic_structures_have_one_declaration_per_instance() {
    let number = Wrapper { inner: 5_u64, count: 1 };
    let text = Wrapper {
        inner: String::from("five"),
        count: 2,
    };

    let mut sink = StructNode::new();
    ObjectAssembler::serialize_named(&mut sink, "number", &number).unwrap();
    ObjectAssembler::serialize_named(&mut sink, "text", &text).unwrap();

    let mut number_back = Wrapper::<u64>::default();
    let mut text_back = Wrapper::<String>::default();
    ObjectAssembler::deserialize_named(&mut sink, "number", &mut number_back).unwrap();
    ObjectAssembler::deserialize_named(&mut sink, "text", &mut text_back).unwrap();
    assert_eq!(number_back, number);
    assert_eq!(text_back, text);

    let err = ObjectAssembler::deserialize_named(&mut sink, "text", &mut number_back).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    assert_eq!(err.path().to_string(), "inner");
}

#[test]
fn recursive_structures() {
    let tree = Tree {
        value: 1,
        children: vec![
            Tree {
                value: 2,
                ..Tree::default()
            },
            Tree {
                value: 3,
                children: vec![Tree {
                    value: 4,
                    ..Tree::default()
                }],
                parent: None,
            },
        ],
        parent: Some(Box::new(Tree {
            value: 0,
            ..Tree::default()
        })),
    };

    let mut sink = StructNode::new();
    ObjectAssembler::serialize(&mut sink, &tree).unwrap();
    let mut back = Tree::default();
    ObjectAssembler::deserialize(&mut sink, &mut back).unwrap();
    assert_eq!(back, tree);

    let dot = ObjectAssembler::<Tree>::graph().unwrap();
    assert!(dot.contains("\"Tree\" [label=\"Tree: Tree\"];"));
    assert!(dot.contains("\"Tree.children[]\" [label=\"children[]: Tree (recursive)\"];"));
    assert!(dot.contains("\"Tree.parent?\" [label=\"parent?: Tree (recursive)\"];"));
}

#[test]
fn optionals_of_every_category() {
    let full = Optionals {
        flag: Some(true),
        text: Some("x".into()),
        base: Some(Base {
            id: 1,
            tag: "t".into(),
        }),
        list: Some(vec![1, 2]),
        quality: Some(Quality::Medium),
        pair: Some((-1, 0.5)),
    };

    let mut sink = StructNode::new();
    ObjectAssembler::serialize(&mut sink, &full).unwrap();
    let mut back = Optionals::default();
    ObjectAssembler::deserialize(&mut sink, &mut back).unwrap();
    assert_eq!(back, full);

    let mut empty_sink = StructNode::new();
    ObjectAssembler::serialize(&mut empty_sink, &Optionals::default()).unwrap();
    assert!(empty_sink.is_empty());

    ObjectAssembler::deserialize(&mut empty_sink, &mut back).unwrap();
    assert_eq!(back, Optionals::default());
}

#[test]
fn malformed_optionals_become_none() {
    let mut source = StructNode::new();
    source.insert("flag", Node::Str("yes".into()));
    source.insert("base", Node::UInt(3));
    source.insert("quality", Node::Str("legendary".into()));
    source.insert("pair", Node::Array(ArrayNode::from(vec![Node::Int(300)])));

    let mut back = Optionals {
        flag: Some(false),
        base: Some(Base::default()),
        quality: Some(Quality::Low),
        pair: Some((0, 0.0)),
        ..Optionals::default()
    };
    ObjectAssembler::deserialize(&mut source, &mut back).unwrap();
    assert_eq!(back, Optionals::default());
}

#[test]
fn string_keyed_map_of_structures() {
    let mut catalog = Catalog::default();
    catalog.entries.insert(
        "alpha".into(),
        Base {
            id: 1,
            tag: "a".into(),
        },
    );
    catalog.entries.insert(
        "beta".into(),
        Base {
            id: 2,
            tag: "b".into(),
        },
    );

    let mut sink = StructNode::new();
    ObjectAssembler::serialize(&mut sink, &catalog).unwrap();

    let entries = sink.get("entries").and_then(Node::as_struct).unwrap();
    assert_eq!(entries.names().collect::<Vec<_>>(), ["alpha", "beta"]);

    let mut back = Catalog::default();
    back.entries.insert("stale".into(), Base::default());
    ObjectAssembler::deserialize(&mut sink, &mut back).unwrap();
    assert_eq!(back, catalog);
}

#[test]
fn text_round_trip() {
    let mut sink = StructNode::new();
    ObjectAssembler::serialize(&mut sink, &derived()).unwrap();
    let text = sink.dump().unwrap();

    let mut source = StructNode::new();
    source.set_raw_input(&text).unwrap();
    let mut back = Derived::default();
    ObjectAssembler::deserialize(&mut source, &mut back).unwrap();
    assert_eq!(back.base, derived().base);
    assert_eq!(back.quality, Quality::High);
}

#[test]
fn derived_names_and_tables() {
    assert_eq!(<Derived as Structure>::type_name(), "Derived");
    assert_eq!(<Wrapper<u8> as Structure>::type_name(), "Wrapper");
    assert_eq!(<Quality as Enumeration>::type_name(), "Quality");

    let table = Quality::table().unwrap();
    assert_eq!(table.names().collect::<Vec<_>>(), ["Low", "Medium", "ultra"]);

    let dot = ObjectAssembler::<Derived>::graph().unwrap();
    assert!(dot.contains("\"Derived.id\" [label=\"id: uint64\"];"));
    assert!(dot.contains("\"Derived.quality\" [label=\"quality: Quality {Low | Medium | ultra}\"];"));
    assert!(!dot.contains("Derived.base"));
}
