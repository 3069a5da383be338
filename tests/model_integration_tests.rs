//! Integration tests for the entity model
//!
//! These tests drive the model the way a parser/resolver does:
//! - Building entities mutably
//! - Interning them through one session provider
//! - Freezing the owning aggregate
//! - Reading the frozen snapshot

use std::sync::Arc;
use tsm::{
    Accessibility, Attribute, ConstantLiteral, ConstantValue, DomRegion, Freezable,
    InterningOptions, InterningProvider, Method, ModelError, Parameter, SharedTypes,
    TypeDefinition, TypeKind, TypeReference,
};

/// Helper to build `System.<name>`
fn system(name: &str) -> Arc<TypeReference> {
    Arc::new(TypeReference::named("System", name))
}

/// Helper to build a parameter the way a parser would, field by field
fn parameter(name: &str, ty: &str, line: u32) -> Arc<Parameter> {
    let mut parameter = Parameter::new();
    parameter.set_name(name).unwrap();
    parameter.set_type(system(ty)).unwrap();
    parameter
        .set_region(DomRegion::at("StringExtensions.cs", line, 30))
        .unwrap();
    Arc::new(parameter)
}

/// Helper to build a small class with overloads
fn string_extensions() -> TypeDefinition {
    let mut definition = TypeDefinition::new("Demo.Text", "StringExtensions", TypeKind::Class);
    definition.set_accessibility(Accessibility::Public).unwrap();

    let mut truncate = Method::new("Truncate");
    truncate.set_return_type(system("String")).unwrap();
    truncate.add_parameter(parameter("value", "String", 5)).unwrap();
    truncate.add_parameter(parameter("length", "Int32", 5)).unwrap();
    definition.add_method(Arc::new(truncate)).unwrap();

    let mut pad = Method::new("Pad");
    pad.set_return_type(system("String")).unwrap();
    pad.add_parameter(parameter("value", "String", 5)).unwrap();
    let mut width = Parameter::with_type("width", system("Int32"));
    width
        .set_default_value(Some(Arc::new(ConstantValue::new(
            system("Int32"),
            ConstantLiteral::Int(8),
        ))))
        .unwrap();
    pad.add_parameter(Arc::new(width)).unwrap();
    definition.add_method(Arc::new(pad)).unwrap();

    definition
}

#[test]
fn test_build_intern_freeze_read() {
    let provider = InterningProvider::new();

    let mut definition = string_extensions();
    definition.intern_members(&provider).unwrap();
    definition.freeze();

    let truncate = &definition.methods()[0];
    let pad = &definition.methods()[1];

    assert_eq!(
        truncate.to_string(),
        "Truncate(value:System.String, length:System.Int32):System.String"
    );
    assert_eq!(
        pad.to_string(),
        "Pad(value:System.String, width:System.Int32 = 8):System.String"
    );

    // Both `value` parameters are the same canonical instance.
    assert!(Arc::ptr_eq(&truncate.parameters()[0], &pad.parameters()[0]));
    // Every `System.Int32` in the graph is one reference.
    assert!(Arc::ptr_eq(
        truncate.parameters()[1].ty(),
        pad.parameters()[1].ty()
    ));
    assert!(Arc::ptr_eq(
        pad.parameters()[1].ty(),
        pad.parameters()[1].default_value().unwrap().ty()
    ));

    assert!(pad.parameters()[1].is_optional());
    assert!(!truncate.parameters()[1].is_optional());
    assert!(definition.is_frozen());
    assert!(pad.parameters()[1].default_value().unwrap().is_frozen());
}

#[test]
fn test_two_snapshots_of_the_same_source_share_within_a_session() {
    let provider = InterningProvider::new();

    let mut first = string_extensions();
    first.intern_members(&provider).unwrap();
    let entities_after_first = provider.len();

    let mut second = string_extensions();
    second.intern_members(&provider).unwrap();

    // Nothing new was registered for the re-parse.
    assert_eq!(provider.len(), entities_after_first);
    for (a, b) in first.methods().iter().zip(second.methods()) {
        assert!(Arc::ptr_eq(a, b));
    }
}

#[test]
fn test_frozen_snapshot_rejects_further_building() {
    let provider = InterningProvider::new();

    let mut definition = string_extensions();
    definition.intern_members(&provider).unwrap();
    definition.freeze();

    assert!(matches!(
        definition.add_method(Arc::new(Method::new("Late"))),
        Err(ModelError::FrozenMutation { .. })
    ));
    assert!(matches!(
        definition.intern_members(&provider),
        Err(ModelError::InternContract(_))
    ));
    assert_eq!(definition.methods().len(), 2);
}

#[test]
fn test_attribute_arguments_are_shared_across_members() {
    let provider = InterningProvider::new();
    let obsolete = || {
        let mut attribute = Attribute::new(system("ObsoleteAttribute"));
        attribute
            .add_positional_argument(Arc::new(ConstantValue::new(
                system("String"),
                ConstantLiteral::String(Arc::from("use Pad")),
            )))
            .unwrap();
        Arc::new(attribute)
    };

    let mut a = Parameter::with_type("a", system("Int32"));
    a.add_attribute(obsolete()).unwrap();
    let mut b = Parameter::with_type("b", system("Int32"));
    b.add_attribute(obsolete()).unwrap();

    let a = provider.intern_object(a).unwrap();
    let b = provider.intern_object(b).unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a.attributes()[0], &b.attributes()[0]));
    assert_eq!(
        a.attributes()[0].to_string(),
        "[System.ObsoleteAttribute(\"use Pad\")]"
    );
}

#[test]
fn test_default_parameter_type_is_unknown_sentinel() {
    let provider = InterningProvider::with_options(InterningOptions {
        pre_intern_common: false,
        expected_entities: 16,
    });

    let parameter = provider.intern_object(Parameter::new()).unwrap();
    assert!(Arc::ptr_eq(parameter.ty(), &SharedTypes::unknown()));
    assert_eq!(parameter.to_string(), ":?");
}

/// Same shape as `string_extensions`, but the way a resolver that caches
/// type references builds it: one `Int32` and one `String` handle for the
/// whole definition, and one default value reused by both overloads.
fn string_extensions_with_shared_handles() -> TypeDefinition {
    let string = system("String");
    let int32 = system("Int32");
    let eight = Arc::new(ConstantValue::new(Arc::clone(&int32), ConstantLiteral::Int(8)));

    let mut definition = TypeDefinition::new("Demo.Text", "StringExtensions", TypeKind::Class);
    definition.set_accessibility(Accessibility::Public).unwrap();

    let build = |method_name: &str, parameter_name: &str| {
        let mut method = Method::new(method_name);
        method.set_return_type(Arc::clone(&string)).unwrap();
        method
            .add_parameter(Arc::new(Parameter::with_type("value", Arc::clone(&string))))
            .unwrap();
        let mut counted = Parameter::with_type(parameter_name, Arc::clone(&int32));
        counted.set_default_value(Some(Arc::clone(&eight))).unwrap();
        method.add_parameter(Arc::new(counted)).unwrap();
        Arc::new(method)
    };
    definition.add_method(build("Truncate", "length")).unwrap();
    definition.add_method(build("Pad", "width")).unwrap();
    definition
}

/// The same definition with a fresh handle everywhere
fn string_extensions_with_fresh_handles() -> TypeDefinition {
    let mut definition = TypeDefinition::new("Demo.Text", "StringExtensions", TypeKind::Class);
    definition.set_accessibility(Accessibility::Public).unwrap();

    for (method_name, parameter_name) in [("Truncate", "length"), ("Pad", "width")] {
        let mut method = Method::new(method_name);
        method.set_return_type(system("String")).unwrap();
        method
            .add_parameter(Arc::new(Parameter::with_type("value", system("String"))))
            .unwrap();
        let mut counted = Parameter::with_type(parameter_name, system("Int32"));
        counted
            .set_default_value(Some(Arc::new(ConstantValue::new(
                system("Int32"),
                ConstantLiteral::Int(8),
            ))))
            .unwrap();
        method.add_parameter(Arc::new(counted)).unwrap();
        definition.add_method(Arc::new(method)).unwrap();
    }
    definition
}

#[test]
fn test_shared_handles_inside_a_definition_are_canonicalized() {
    let provider = InterningProvider::new();

    let mut shared = string_extensions_with_shared_handles();
    shared.intern_members(&provider).unwrap();
    let after_shared = provider.len();

    let mut fresh = string_extensions_with_fresh_handles();
    fresh.intern_members(&provider).unwrap();

    // Nothing new: every member of the second definition was already known.
    assert_eq!(provider.len(), after_shared);
    // Sentinels, two types, one constant, three parameters, two methods.
    assert_eq!(provider.len(), SharedTypes::all().len() + 8);

    for (a, b) in shared.methods().iter().zip(fresh.methods()) {
        assert!(Arc::ptr_eq(a, b));
        assert!(Arc::ptr_eq(a.return_type(), b.return_type()));
        assert!(a.parameters().ptr_eq(b.parameters()));
        assert!(provider.is_canonical(a.return_type()));
    }

    let truncate = &shared.methods()[0];
    let pad = &shared.methods()[1];
    assert!(Arc::ptr_eq(&truncate.parameters()[0], &pad.parameters()[0]));
    assert!(Arc::ptr_eq(
        truncate.parameters()[1].ty(),
        pad.parameters()[1].ty()
    ));
    let length_default = truncate.parameters()[1].default_value().unwrap();
    let width_default = pad.parameters()[1].default_value().unwrap();
    assert!(Arc::ptr_eq(length_default, width_default));
    assert!(Arc::ptr_eq(length_default.ty(), truncate.parameters()[1].ty()));
    assert!(provider.is_canonical(length_default));
}
