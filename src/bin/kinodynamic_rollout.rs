//
// Random kinodynamic rollouts through a box field.
//
// Grows a tree of valid states by repeatedly picking a node, sampling a
// control and a duration, propagating and keeping the successor if it passes
// the validity checker.
//
// usage: kinodynamic_rollout [robot_type] [seed]

use std::env;
use std::process;
use std::sync::Arc;

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use kinodynamic_robots::kinodynamics::{
    create_robot, ObstacleEnvironment, Robot, StateValidityChecker, VehicleState, ROBOT_TYPES,
};
use kinodynamic_robots::utils::{colors, PathStyle, Visualizer};
use kinodynamic_robots::{RealVectorBounds, RoboticsResult};

#[derive(Debug, Clone)]
struct RolloutConfig {
    robot_type: String,
    seed: u64,
    expansions: usize,
    min_duration: f64,
    max_duration: f64,
    start: (f64, f64),
    // Footprints of every n-th kept node are drawn
    footprint_stride: usize,
    output: String,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            robot_type: "car_first_order_with_1_trailers_0".to_string(),
            seed: 7,
            expansions: 2000,
            min_duration: 0.1,
            max_duration: 1.5,
            start: (-4.0, 0.0),
            footprint_stride: 40,
            output: "kinodynamic_rollout.png".to_string(),
        }
    }
}

struct Node {
    state: VehicleState,
    parent: Option<usize>,
}

fn build_environment() -> ObstacleEnvironment {
    let mut env = ObstacleEnvironment::new();
    env.add_box(-1.5, 2.0, 0.0, Vector3::new(1.0, 4.0, 1.0))
        .add_box(1.5, -2.0, 0.0, Vector3::new(1.0, 4.0, 1.0))
        .add_box(3.5, 2.5, 0.4, Vector3::new(1.5, 0.8, 1.0))
        .add_box(0.0, 0.0, 0.0, Vector3::new(0.4, 0.4, 1.0));
    env
}

fn run(config: &RolloutConfig) -> RoboticsResult<()> {
    let bounds = RealVectorBounds::planar(-5.0, 5.0, -5.0, 5.0)?;
    let robot = create_robot(&config.robot_type, &bounds)?;
    let env = Arc::new(build_environment());
    let checker = StateValidityChecker::new(robot.clone(), env.clone());
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut start = robot.alloc_state();
    robot.set_position(&mut start, &Vector3::new(config.start.0, config.start.1, 0.0));
    if !checker.is_valid(&start) {
        log::error!("start state {:?} is not valid", config.start);
        return Ok(());
    }

    let mut nodes = vec![Node {
        state: start,
        parent: None,
    }];
    let mut rejected = 0usize;
    let mut next = robot.alloc_state();

    for _ in 0..config.expansions {
        let parent = rng.gen_range(0..nodes.len());
        let control = robot.control_space().sample_uniform(&mut rng);
        let duration = rng.gen_range(config.min_duration..config.max_duration);
        robot.propagate(&nodes[parent].state, &control, duration, &mut next);

        if checker.is_valid(&next) {
            nodes.push(Node {
                state: next.clone(),
                parent: Some(parent),
            });
        } else {
            rejected += 1;
        }
    }

    let cells = robot.state_space().default_cell_sizes();
    let spread = nodes
        .iter()
        .map(|n| robot.state_space().distance(&nodes[0].state, &n.state))
        .fold(0.0, f64::max);
    log::info!(
        "{}: kept {} states, rejected {} successors, max distance from start {:.3}",
        robot.name(),
        nodes.len(),
        rejected,
        spread
    );
    log::info!("projection cell sizes: ({:.3}, {:.3})", cells.x, cells.y);

    plot(config, robot.as_ref(), &env, &nodes)
}

fn plot(config: &RolloutConfig, robot: &dyn Robot, env: &ObstacleEnvironment, nodes: &[Node]) -> RoboticsResult<()> {
    let mut vis = Visualizer::new();
    vis.set_title(&format!("Random rollouts: {}", robot.name()))
        .set_x_range(-5.0, 5.0)
        .set_y_range(-5.0, 5.0);

    vis.plot_obstacles(env);

    let edge_style = PathStyle::new(colors::CYAN, "Rollouts").with_line_width(1.0);
    for node in nodes {
        if let Some(parent) = node.parent {
            let from = &nodes[parent].state;
            vis.plot_path_xy(&[from.x(), node.state.x()], &[from.y(), node.state.y()], &edge_style);
        }
    }

    for node in nodes.iter().step_by(config.footprint_stride.max(1)) {
        vis.plot_robot(robot, &node.state, 1.0);
    }
    vis.plot_robot(robot, &nodes[0].state, 2.0);

    vis.save_png(&config.output, 800, 800)?;
    log::info!("saved {}", config.output);
    Ok(())
}

fn main() {
    env_logger::init();

    let mut config = RolloutConfig::default();
    let mut args = env::args().skip(1);
    if let Some(robot_type) = args.next() {
        config.robot_type = robot_type;
    }
    if let Some(seed) = args.next() {
        match seed.parse() {
            Ok(seed) => config.seed = seed,
            Err(_) => {
                log::error!("seed must be an unsigned integer, got '{}'", seed);
                process::exit(2);
            }
        }
    }
    log::debug!("known robot types: {}", ROBOT_TYPES.join(", "));

    if let Err(e) = run(&config) {
        log::error!("{}", e);
        process::exit(1);
    }
}
