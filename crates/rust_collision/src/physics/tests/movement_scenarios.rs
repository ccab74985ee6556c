//! Movement scenarios: blocking, tunneling, sliding and index upkeep

use approx::assert_relative_eq;

use super::support::{boxed, recorded, Recorder, Seen};
use crate::foundation::math::WorldPosition;
use crate::physics::{LayerRegistry, MoveStatus, StepPath, Tags};

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> LayerRegistry {
        crate::foundation::logging::init_for_tests();
        LayerRegistry::with_layers(Tags::ENVIRONMENT)
    }

    #[test]
    fn test_move_to_current_center_is_noop() {
        let registry = corridor();
        let recorder = Recorder::shared();
        let id = registry
            .register(recorded(boxed(5.0, 5.0, 4.0, 4.0), &recorder))
            .unwrap();
        registry
            .register(boxed(7.0, 5.0, 4.0, 4.0).with_tags(Tags::PROP))
            .unwrap();

        let outcome = registry.move_collider(id, WorldPosition::new(5.0, 5.0)).unwrap();

        assert_eq!(outcome.status, MoveStatus::Unchanged);
        assert_eq!(outcome.steps, 0);
        assert_eq!(outcome.position, WorldPosition::new(5.0, 5.0));
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_flush_stop_against_wall() {
        let registry = corridor();
        registry
            .register(boxed(150.0, 0.0, 128.0, 128.0).with_tags(Tags::ENVIRONMENT))
            .unwrap();
        let mover = registry
            .register(boxed(0.0, 0.0, 32.0, 32.0).with_block(Tags::ENVIRONMENT))
            .unwrap();

        let outcome = registry.move_collider(mover, WorldPosition::new(250.0, 0.0)).unwrap();

        assert_eq!(outcome.status, MoveStatus::Blocked);
        assert_eq!(outcome.steps, 70);
        assert_relative_eq!(outcome.position.x, 70.0);
        assert_relative_eq!(outcome.position.y, 0.0);
        assert_eq!(registry.position(mover), Some(outcome.position));

        // Pressing again makes no progress
        let again = registry.move_collider(mover, WorldPosition::new(250.0, 0.0)).unwrap();
        assert!(again.is_blocked());
        assert_eq!(again.steps, 0);
        assert_relative_eq!(again.position.x, 70.0);
    }

    #[test]
    fn test_no_tunneling_through_thin_wall() {
        let registry = corridor();
        // Half a unit thick: left side at 49.75
        registry
            .register(boxed(50.0, 0.0, 0.5, 40.0).with_tags(Tags::ENVIRONMENT))
            .unwrap();
        let mover = registry
            .register(boxed(0.0, 0.0, 2.0, 2.0).with_block(Tags::ENVIRONMENT))
            .unwrap();

        let outcome = registry.move_collider(mover, WorldPosition::new(10_000.0, 0.0)).unwrap();

        assert!(outcome.is_blocked());
        assert!(outcome.position.x + 1.0 <= 49.75);
        assert_relative_eq!(outcome.position.x, 48.0);
    }

    #[test]
    fn test_blocked_position_stays_on_path() {
        let registry = corridor();
        registry
            .register(boxed(40.0, 30.0, 10.0, 10.0).with_tags(Tags::ENVIRONMENT))
            .unwrap();
        let mover = registry
            .register(boxed(0.0, 0.0, 4.0, 4.0).with_block(Tags::ENVIRONMENT))
            .unwrap();
        let start = WorldPosition::new(0.0, 0.0);
        let target = WorldPosition::new(80.0, 60.0);

        let outcome = registry.move_collider(mover, target).unwrap();
        assert!(outcome.is_blocked());

        // Committed position is the step the path reached before the wall
        let expected = StepPath::new(start, target).nth(outcome.steps - 1).unwrap();
        assert_relative_eq!(outcome.position.x, expected.x, epsilon = 1e-4);
        assert_relative_eq!(outcome.position.y, expected.y, epsilon = 1e-4);
        // and lies on the segment from the start
        assert_relative_eq!(outcome.position.y / outcome.position.x, 0.75, epsilon = 1e-4);
    }

    #[test]
    fn test_path_is_monotonic() {
        let start = WorldPosition::new(-3.0, 7.0);
        let target = WorldPosition::new(40.0, -12.5);
        let mut previous = 0.0;

        for position in StepPath::new(start, target) {
            let travelled = (position - start).norm();
            assert!(travelled > previous);
            previous = travelled;
        }
        assert_relative_eq!(previous, (target - start).norm(), epsilon = 1e-4);
    }

    #[test]
    fn test_move_reindexes_every_layer() {
        let registry = LayerRegistry::with_layers(Tags::ENEMY | Tags::ENVIRONMENT);
        let enemy = registry
            .register(boxed(10.0, 10.0, 8.0, 8.0).with_tags(Tags::ENEMY))
            .unwrap();
        let before = registry.collider(enemy).unwrap().aabb();

        registry.move_collider(enemy, WorldPosition::new(210.0, -90.0)).unwrap();
        let after = registry.collider(enemy).unwrap().aabb();

        let state = registry.lock();
        for layer in [state.lookup(Tags::ENEMY).unwrap(), state.all_colliders()] {
            assert!(!layer.query(&before).contains(&enemy));
            assert_eq!(layer.query(&after), vec![enemy]);
            assert_eq!(layer.occupied_cells(), 1);
        }
        assert!(!state.lookup(Tags::ENVIRONMENT).unwrap().contains(enemy));
    }

    #[test]
    fn test_unknown_block_layer_is_skipped() {
        let registry = corridor();
        let gate = registry
            .register(boxed(20.0, 0.0, 4.0, 4.0).with_tags(Tags::TRIGGER))
            .unwrap();
        let recorder = Recorder::shared();
        let mover = registry
            .register(recorded(
                boxed(0.0, 0.0, 2.0, 2.0).with_block(Tags::TRIGGER | Tags::ENVIRONMENT),
                &recorder,
            ))
            .unwrap();

        let outcome = registry.move_collider(mover, WorldPosition::new(40.0, 0.0)).unwrap();

        assert_eq!(outcome.status, MoveStatus::Committed);
        assert_relative_eq!(outcome.position.x, 40.0);
        // Still seen by the notification pass
        assert_eq!(recorder.enters(), 1);
        assert_eq!(recorder.exits(), 1);
        assert!(registry.collider(gate).is_some());
    }

    #[test]
    fn test_slide_along_wall() {
        let registry = corridor();
        // Ceiling with its underside at y = 15
        registry
            .register(boxed(0.0, 20.0, 200.0, 10.0).with_tags(Tags::ENVIRONMENT))
            .unwrap();
        let mover = registry
            .register(boxed(0.0, 0.0, 4.0, 4.0).with_block(Tags::ENVIRONMENT))
            .unwrap();

        let outcome = registry.slide_collider(mover, WorldPosition::new(30.0, 30.0)).unwrap();

        assert_eq!(outcome.status, MoveStatus::Blocked);
        assert_relative_eq!(outcome.position.x, 30.0);
        assert!(outcome.position.y + 2.0 <= 15.0);
        assert!(outcome.position.y > 12.0);
    }

    #[test]
    fn test_slide_without_obstacle_is_direct() {
        let registry = corridor();
        let mover = registry
            .register(boxed(0.0, 0.0, 4.0, 4.0).with_block(Tags::ENVIRONMENT))
            .unwrap();

        let outcome = registry.slide_collider(mover, WorldPosition::new(-6.0, 8.0)).unwrap();

        assert_eq!(outcome.status, MoveStatus::Committed);
        assert_eq!(outcome.steps, 10);
        assert_eq!(outcome.position, WorldPosition::new(-6.0, 8.0));
    }

    #[test]
    fn test_overlapping_start_can_escape() {
        let registry = corridor();
        registry
            .register(boxed(0.0, 0.0, 10.0, 10.0).with_tags(Tags::ENVIRONMENT))
            .unwrap();
        let mover = registry
            .register(boxed(3.0, 0.0, 4.0, 4.0).with_block(Tags::ENVIRONMENT))
            .unwrap();

        let outcome = registry.move_collider(mover, WorldPosition::new(30.0, 0.0)).unwrap();

        assert_eq!(outcome.status, MoveStatus::Committed);
        assert_relative_eq!(outcome.position.x, 30.0);
    }

    #[test]
    fn test_ignored_tag_still_blocks() {
        let registry = corridor();
        let wall_recorder = Recorder::shared();
        let wall = registry
            .register(recorded(
                boxed(150.0, 0.0, 128.0, 128.0).with_tags(Tags::ENVIRONMENT),
                &wall_recorder,
            ))
            .unwrap();
        let recorder = Recorder::shared();
        let mover = registry
            .register(recorded(
                boxed(0.0, 0.0, 32.0, 32.0)
                    .with_block(Tags::ENVIRONMENT)
                    .with_ignore(Tags::ENVIRONMENT),
                &recorder,
            ))
            .unwrap();

        let outcome = registry.move_collider(mover, WorldPosition::new(250.0, 0.0)).unwrap();

        assert!(outcome.is_blocked());
        assert_relative_eq!(outcome.position.x, 70.0);
        // Ignoring only mutes the notification pass; the block itself is reported
        assert_eq!(recorder.events(), vec![Seen::Enter(wall)]);
        assert_eq!(wall_recorder.events(), vec![Seen::Enter(mover)]);

        // Still flush against the wall: no repeat
        let again = registry.move_collider(mover, WorldPosition::new(250.0, 0.0)).unwrap();
        assert_eq!(again.steps, 0);
        assert_eq!(recorder.enters(), 1);
        assert_eq!(wall_recorder.enters(), 1);
    }

    #[test]
    fn test_overlapping_start_cannot_go_deeper() {
        let registry = corridor();
        registry
            .register(boxed(0.0, 0.0, 10.0, 10.0).with_tags(Tags::ENVIRONMENT))
            .unwrap();
        // Straddles the wall's right side at x = 5
        let mover = registry
            .register(boxed(6.0, 0.0, 4.0, 4.0).with_block(Tags::ENVIRONMENT))
            .unwrap();

        let deeper = registry.move_collider(mover, WorldPosition::new(-30.0, 0.0)).unwrap();
        assert!(deeper.is_blocked());
        assert_eq!(deeper.steps, 0);
        assert_eq!(deeper.position, WorldPosition::new(6.0, 0.0));

        // Moving along the side keeps the shared area, so it is allowed
        let sideways = registry.move_collider(mover, WorldPosition::new(6.0, 2.0)).unwrap();
        assert_eq!(sideways.status, MoveStatus::Committed);
        assert_eq!(sideways.position, WorldPosition::new(6.0, 2.0));
    }

    #[test]
    fn test_escaped_wall_blocks_on_return() {
        let registry = corridor();
        registry
            .register(boxed(0.0, 0.0, 10.0, 10.0).with_tags(Tags::ENVIRONMENT))
            .unwrap();
        let mover = registry
            .register(boxed(3.0, 0.0, 4.0, 4.0).with_block(Tags::ENVIRONMENT))
            .unwrap();

        // Once out, the wall blocks like any other
        registry.move_collider(mover, WorldPosition::new(30.0, 0.0)).unwrap();
        let back = registry.move_collider(mover, WorldPosition::new(-30.0, 0.0)).unwrap();

        assert!(back.is_blocked());
        // Left side flush with the wall's right side at x = 5
        assert_relative_eq!(back.position.x, 7.0);
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_dense_cell_still_resolves() {
        let registry = corridor();
        // 150 props packed into the chunk above the lane, clear of the mover
        for i in 0..150 {
            let x = 70.0 + (i % 50) as f32;
            let y = 40.0 + (i / 50) as f32 * 4.0;
            registry
                .register(boxed(x, y, 1.0, 1.0).with_tags(Tags::PROP))
                .unwrap();
        }
        registry
            .register(boxed(110.0, 10.0, 4.0, 4.0).with_tags(Tags::ENVIRONMENT))
            .unwrap();
        let recorder = Recorder::shared();
        let mover = registry
            .register(recorded(
                boxed(70.0, 10.0, 4.0, 4.0).with_block(Tags::ENVIRONMENT),
                &recorder,
            ))
            .unwrap();

        let outcome = registry.move_collider(mover, WorldPosition::new(126.0, 10.0)).unwrap();

        assert!(outcome.is_blocked());
        // Wall's left side at 108, mover half-width 2
        assert_relative_eq!(outcome.position.x, 106.0);
        assert_eq!(recorder.events().len(), 1);
    }
}
