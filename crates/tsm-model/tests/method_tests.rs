use super::*;
use crate::error::ModelError;

fn string() -> Arc<TypeReference> {
    Arc::new(TypeReference::named("System", "String"))
}

fn int32() -> Arc<TypeReference> {
    Arc::new(TypeReference::named("System", "Int32"))
}

fn substring() -> Method {
    let mut method = Method::new("Substring");
    method.set_return_type(string()).unwrap();
    method.set_accessibility(Accessibility::Public).unwrap();
    method
        .add_parameter(Arc::new(Parameter::with_type("startIndex", int32())))
        .unwrap();
    method
        .add_parameter(Arc::new(Parameter::with_type("length", int32())))
        .unwrap();
    method
}

#[test]
fn test_display() {
    assert_eq!(
        substring().to_string(),
        "Substring(startIndex:System.Int32, length:System.Int32):System.String"
    );

    let mut generic = Method::new("Select");
    generic.add_type_parameter("TSource").unwrap();
    generic.add_type_parameter("TResult").unwrap();
    assert_eq!(generic.to_string(), "Select<TSource, TResult>():?");
}

#[test]
fn test_modifiers() {
    let mut method = Method::new("Where");
    method
        .set_modifiers(MethodModifiers::STATIC | MethodModifiers::EXTENSION)
        .unwrap();
    assert!(method.is_static());
    assert!(method.is_extension());
    assert!(!method.modifiers().contains(MethodModifiers::VIRTUAL));
}

#[test]
fn test_freeze_cascades_through_parameters() {
    let method = substring();
    method.freeze();

    assert!(method.return_type().is_frozen());
    for parameter in method.parameters() {
        assert!(parameter.is_frozen());
        assert!(parameter.ty().is_frozen());
    }
}

#[test]
fn test_mutators_rejected_after_freeze() {
    let mut method = substring();
    method.freeze();
    let frozen = Err(ModelError::FrozenMutation { entity: "method" });

    assert_eq!(method.set_name("Remove"), frozen);
    assert_eq!(method.set_return_type(SharedTypes::unknown()), frozen);
    assert_eq!(method.add_parameter(Arc::new(Parameter::new())), frozen);
    assert_eq!(method.add_type_parameter("T"), frozen);
    assert_eq!(method.set_accessibility(Accessibility::Private), frozen);
    assert_eq!(method.set_modifiers(MethodModifiers::SEALED), frozen);
    assert_eq!(method.set_region(DomRegion::EMPTY), frozen);
    assert!(method.attributes_mut().is_err());
    assert!(method.parameters_mut().is_err());

    assert_eq!(method.name(), "Substring");
    assert_eq!(method.parameters().len(), 2);
    assert_eq!(method.accessibility(), Accessibility::Public);
}

#[test]
fn test_overloads_share_parameter_lists() {
    let provider = InterningProvider::new();

    let mut first = Method::new("Substring");
    first
        .add_parameter(Arc::new(Parameter::with_type("startIndex", int32())))
        .unwrap();
    let mut second = Method::new("Remove");
    second
        .add_parameter(Arc::new(Parameter::with_type("startIndex", int32())))
        .unwrap();

    let first = provider.intern_object(first).unwrap();
    let second = provider.intern_object(second).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(first.parameters().ptr_eq(second.parameters()));
    assert!(provider.is_canonical_list(first.parameters()));
}

#[test]
fn test_equal_methods_intern_to_one_instance() {
    let provider = InterningProvider::new();

    let a = provider.intern_object(substring()).unwrap();
    let b = provider.intern_object(substring()).unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let mut different = substring();
    different.set_accessibility(Accessibility::Internal).unwrap();
    let c = provider.intern_object(different).unwrap();
    assert!(!Arc::ptr_eq(&a, &c));
    assert!(a.parameters().ptr_eq(c.parameters()));
}

#[test]
fn test_parameters_mut_unseals_a_copy() {
    let provider = InterningProvider::new();

    let canonical = provider.intern_object(substring()).unwrap();

    let mut method = substring();
    method.prepare_for_interning(&provider).unwrap();
    assert!(method.parameters().ptr_eq(canonical.parameters()));

    method
        .add_parameter(Arc::new(Parameter::with_type("extra", int32())))
        .unwrap();
    assert_eq!(method.parameters().len(), 3);
    assert_eq!(canonical.parameters().len(), 2);
    assert!(!method.parameters().is_sealed());
}
