//! Concurrent interning and frozen-read tests.
//!
//! The provider must hand out exactly one canonical instance per fingerprint
//! even when threads race to intern equal entities, and frozen aggregates
//! must be readable from many threads at once.

use rayon::prelude::*;
use std::sync::{Arc, Barrier};
use std::thread;
use tsm::{Freezable, InterningProvider, Method, Parameter, TypeDefinition, TypeKind, TypeReference};

fn count_parameter() -> Parameter {
    let mut parameter = Parameter::new();
    parameter.set_name("count").unwrap();
    parameter
        .set_type(Arc::new(TypeReference::named("System", "Int32")))
        .unwrap();
    parameter
}

#[test]
fn test_racing_threads_agree_on_one_canonical_instance() {
    let provider = Arc::new(InterningProvider::new());
    let num_threads = 8;
    let interns_per_thread = 200;
    let barrier = Arc::new(Barrier::new(num_threads));

    let mut handles = vec![];

    for _ in 0..num_threads {
        let p = Arc::clone(&provider);
        let b = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            b.wait();
            (0..interns_per_thread)
                .map(|_| p.intern_object(count_parameter()).unwrap())
                .collect::<Vec<_>>()
        }));
    }

    let results: Vec<Arc<Parameter>> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();

    let canonical = &results[0];
    assert!(results.iter().all(|p| Arc::ptr_eq(p, canonical)));
    assert_eq!(provider.canonical_count(&**canonical), 1);
    // Sentinels, Int32 and one parameter.
    assert_eq!(provider.len(), 5);
}

#[test]
fn test_racing_threads_with_distinct_names() {
    let provider = Arc::new(InterningProvider::new());
    let num_threads = 4;
    let barrier = Arc::new(Barrier::new(num_threads));

    let mut handles = vec![];
    for t in 0..num_threads {
        let p = Arc::clone(&provider);
        let b = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            b.wait();
            for i in 0..50 {
                // Every thread interns all 50 names, in a thread-specific order.
                let name = format!("arg{}", (i + t * 13) % 50);
                let int32 = Arc::new(TypeReference::named("System", "Int32"));
                p.intern_object(Parameter::with_type(&name, int32)).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // Sentinels, Int32 and 50 parameters.
    assert_eq!(provider.len(), 3 + 1 + 50);
}

#[test]
fn test_frozen_aggregate_parallel_reads() {
    let provider = InterningProvider::new();

    let mut definition = TypeDefinition::new("Demo", "Wide", TypeKind::Class);
    for i in 0..100 {
        let mut method = Method::new(&format!("M{i}"));
        method
            .add_parameter(Arc::new(count_parameter()))
            .unwrap();
        definition.add_method(Arc::new(method)).unwrap();
    }
    definition.intern_members(&provider).unwrap();
    definition.freeze();

    let definition = Arc::new(definition);
    let rendered: Vec<String> = (0..100)
        .into_par_iter()
        .map(|i| {
            let method = &definition.methods()[i];
            assert!(method.is_frozen());
            method.to_string()
        })
        .collect();

    assert_eq!(rendered[7], "M7(count:System.Int32):?");
    let first = definition.methods()[0].parameters();
    assert!(
        definition
            .methods()
            .iter()
            .all(|method| method.parameters().ptr_eq(first))
    );
}
