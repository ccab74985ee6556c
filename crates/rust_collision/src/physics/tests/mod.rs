//! Scenario tests for registry, movement and notifications working together

mod movement_scenarios;
mod support;
