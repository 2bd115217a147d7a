use approx::assert_relative_eq;

use super::Fixture;

fn platform_world() -> Fixture {
    let world = Fixture::new();
    world.add(world.factory.platform(0.0, 100.0, 50.0, 10.0));
    world
}

#[test]
fn test_platform_blocks_deep_downward_overlap() {
    let world = platform_world();
    // moved box spans 94..104: overlap starts 6 below its top, past the centre
    let mut body = world.body(0.0, 89.0, 10.0, 10.0, 0.0);
    body.set_velocity(0.0, 5.0);

    body.update(1.0);

    assert_relative_eq!(body.velocity().y, 1.0);
    assert_relative_eq!(body.max_position().y, 100.0);
    assert!(body.on_ground());
}

#[test]
fn test_platform_ignores_shallow_overlap() {
    let world = platform_world();
    // moved box spans 97..107: overlap starts 3 below its top, above the centre
    let mut body = world.body(0.0, 92.0, 10.0, 10.0, 0.0);
    body.set_velocity(0.0, 5.0);

    body.update(1.0);

    assert_relative_eq!(body.velocity().y, 5.0);
    assert_relative_eq!(body.position().y, 97.0);
    assert!(!body.on_ground());
}

#[test]
fn test_platform_never_blocks_upward_motion() {
    let world = platform_world();
    let mut body = world.body(0.0, 111.0, 10.0, 10.0, 0.0);
    body.set_velocity(0.0, -5.0);

    body.update(1.0);

    assert_relative_eq!(body.velocity().y, -5.0);
    assert_relative_eq!(body.position().y, 106.0);
    assert!(!body.on_ground());
}

#[test]
fn test_platform_never_blocks_sideways_motion() {
    let world = platform_world();
    let mut body = world.body(-12.0, 100.0, 10.0, 5.0, 0.0);
    body.set_velocity(5.0, 0.0);

    body.update(1.0);

    assert_relative_eq!(body.position().x, -7.0);
}
