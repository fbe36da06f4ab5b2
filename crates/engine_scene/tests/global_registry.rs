use engine_component::TypeId;
use engine_reflect::global;
use engine_scene::{SkyComponent, register_global};

#[test]
fn test_register_global_lasts_as_long_as_guards() {
    let guards = register_global();
    assert!(!guards.is_empty());
    {
        let registry = global::read();
        assert!(registry.component_info(TypeId::of::<SkyComponent>()).is_some());
        assert_eq!(registry.finalize(), Ok(()));
    }
    drop(guards);
    assert!(global::read().is_empty());

    let again = register_global();
    assert!(global::read().contains_type(TypeId::of::<SkyComponent>()));
    drop(again);
}
