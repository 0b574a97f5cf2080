//! AfterHours Headless Scenario Harness
//!
//! Validates navigation, routing and pursuit behavior end to end.
//! Runs entirely in-process: no rendering, no audio, no host game.
//!
//! Usage:
//!   cargo run -p afterhours-simtest
//!   cargo run -p afterhours-simtest -- --verbose
//!   cargo run -p afterhours-simtest -- --level my_level.json
//!   RUST_LOG=debug cargo run -p afterhours-simtest

use afterhours_core::prelude::*;
use afterhours_logic::astar::{find_path, path_length};
use afterhours_logic::capture::Cause;
use afterhours_logic::direct::{resolve_direction, DirectParams};
use afterhours_logic::topology::{self, Severity};
use log::info;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let level_path = args
        .iter()
        .position(|a| a == "--level")
        .and_then(|i| args.get(i + 1));
    println!("=== AfterHours Scenario Harness ===\n");

    let mut results = Vec::new();

    // 1. Built-in levels load and validate
    results.extend(validate_levels(verbose));

    // 2. Grids and A* on the office floor
    results.extend(validate_grids(verbose));

    // 3. Direct resolver
    results.extend(validate_direct(verbose));

    // 4. Room routing
    results.extend(validate_routing(verbose));

    // 5. Pursuit scenarios
    results.extend(validate_scenarios(verbose));

    // 6. Configuration
    results.extend(validate_config(verbose));

    // 7. User-supplied level
    if let Some(path) = level_path {
        results.extend(validate_level_file(path));
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load(spec: &LevelSpec, config: SimConfig) -> Result<Simulation, String> {
    Simulation::from_level(spec, config).map_err(|e| e.to_string())
}

// ── 1. Levels ───────────────────────────────────────────────────────────

fn validate_levels(verbose: bool) -> Vec<TestResult> {
    println!("--- Levels ---");
    let mut results = Vec::new();

    let office = load(&LevelSpec::office(), SimConfig::default());
    results.push(TestResult {
        name: "office_loads".into(),
        passed: office.as_ref().is_ok_and(|s| s.agent_count() == 5),
        detail: match &office {
            Ok(s) => format!("{} agents", s.agent_count()),
            Err(e) => e.clone(),
        },
    });

    for n in 1..=5 {
        let sim = load(&LevelSpec::linear(n), SimConfig::default());
        results.push(TestResult {
            name: format!("linear_{}_loads", n),
            passed: sim.is_ok(),
            detail: sim.err().unwrap_or_else(|| format!("{} rooms", n)),
        });
    }

    let round_trip = LevelSpec::office()
        .to_json_string()
        .and_then(|json| LevelSpec::from_json_str(&json));
    results.push(TestResult {
        name: "office_json_round_trip".into(),
        passed: round_trip.as_ref().is_ok_and(|spec| *spec == LevelSpec::office()),
        detail: match &round_trip {
            Ok(_) => "identical after JSON".into(),
            Err(e) => e.to_string(),
        },
    });

    if verbose {
        if let Ok(sim) = &office {
            for room in sim.floor().topology.rooms() {
                let walkable = sim.floor().nav(room.id).map_or(0, |n| n.grid.walkable_count());
                println!("  room {} '{}': {} walkable cells", room.id, room.name, walkable);
            }
        }
    }

    results
}

// ── 2. Grids ────────────────────────────────────────────────────────────

fn validate_grids(_verbose: bool) -> Vec<TestResult> {
    println!("--- Grids ---");
    let mut results = Vec::new();
    let config = SimConfig::default();
    let floor = Floor::build(&LevelSpec::office(), &config.nav, config.direct);

    let findings = topology::validate(&floor.topology, &floor.grids(), config.nav.agent_size);
    let errors = findings.iter().filter(|f| f.severity == Severity::Error).count();
    results.push(TestResult {
        name: "office_validation_clean".into(),
        passed: errors == 0,
        detail: format!("{} findings, {} errors", findings.len(), errors),
    });

    // Every spawn point reaches its room's center
    let mut unreachable = Vec::new();
    let mut clipped = 0;
    for door in floor.topology.doorways() {
        let (Some(nav), Some(room)) = (floor.nav(door.to), floor.room(door.to)) else {
            unreachable.push(format!("{}->{}", door.from, door.to));
            continue;
        };
        let start = floor.landing(door, config.nav.agent_size / 2.0);
        let path = find_path(&nav.grid, start, nav.grid.snap_to_walkable(room.center()).unwrap_or(start));
        if path.is_empty() && start.distance(&room.center()) > config.nav.cell_size {
            unreachable.push(format!("{}->{}", door.from, door.to));
        }
        clipped += path.iter().filter(|p| !nav.grid.is_walkable(p.x, p.y)).count();
    }
    results.push(TestResult {
        name: "spawns_reach_room_center".into(),
        passed: unreachable.is_empty(),
        detail: if unreachable.is_empty() {
            format!("{} doorways", floor.topology.doorways().len())
        } else {
            format!("unreachable: {}", unreachable.join(", "))
        },
    });
    results.push(TestResult {
        name: "waypoints_walkable".into(),
        passed: clipped == 0,
        detail: format!("{} blocked waypoints", clipped),
    });

    // Walled-in goal yields no path
    let grid = afterhours_logic::grid::NavGrid::build(
        Rect::new(0.0, 0.0, 200.0, 200.0),
        &[
            Rect::new(120.0, 120.0, 60.0, 10.0),
            Rect::new(120.0, 170.0, 60.0, 10.0),
            Rect::new(120.0, 120.0, 10.0, 60.0),
            Rect::new(170.0, 120.0, 10.0, 60.0),
        ],
        config.nav.cell_size,
        0.0,
    );
    let path = find_path(&grid, Vec2::new(10.0, 10.0), Vec2::new(150.0, 150.0));
    results.push(TestResult {
        name: "enclosed_goal_empty".into(),
        passed: path.is_empty(),
        detail: format!("{} waypoints", path.len()),
    });

    // Open-room path is close to straight
    let open = afterhours_logic::grid::NavGrid::build(
        Rect::new(0.0, 0.0, 400.0, 400.0),
        &[],
        config.nav.cell_size,
        0.0,
    );
    let (a, b) = (Vec2::new(10.0, 10.0), Vec2::new(390.0, 250.0));
    let len = path_length(&find_path(&open, a, b));
    let straight = a.distance(&b);
    results.push(TestResult {
        name: "open_path_near_straight".into(),
        passed: len > 0.0 && len <= straight * 1.5 + config.nav.cell_size,
        detail: format!("path {:.0} vs straight {:.0}", len, straight),
    });

    results
}

// ── 3. Direct resolver ──────────────────────────────────────────────────

fn validate_direct(_verbose: bool) -> Vec<TestResult> {
    println!("--- Direct Resolver ---");
    let mut results = Vec::new();
    let params = DirectParams::default();
    let bounds = Rect::new(0.0, 0.0, 400.0, 400.0);

    let clear = resolve_direction(Vec2::new(50.0, 200.0), Vec2::new(350.0, 200.0), &[], bounds, &params);
    results.push(TestResult {
        name: "direct_clear_line".into(),
        passed: (clear.x - 1.0).abs() < 1e-4 && clear.y.abs() < 1e-4,
        detail: format!("{:?}", clear),
    });

    let at_target = resolve_direction(Vec2::new(200.0, 200.0), Vec2::new(201.0, 200.0), &[], bounds, &params);
    results.push(TestResult {
        name: "direct_at_target_zero".into(),
        passed: at_target == Vec2::ZERO,
        detail: format!("{:?}", at_target),
    });

    let boxed = [
        Rect::new(0.0, 0.0, 400.0, 180.0),
        Rect::new(0.0, 220.0, 400.0, 180.0),
        Rect::new(0.0, 0.0, 180.0, 400.0),
        Rect::new(220.0, 0.0, 180.0, 400.0),
    ];
    let from = Vec2::new(200.0, 200.0);
    let to = Vec2::new(380.0, 380.0);
    let stuck = resolve_direction(from, to, &boxed, bounds, &params);
    let ideal = (to - from).normalize();
    results.push(TestResult {
        name: "direct_boxed_in_keeps_heading".into(),
        passed: stuck.distance(&ideal) < 1e-4,
        detail: format!("{:?}", stuck),
    });

    results
}

// ── 4. Routing ──────────────────────────────────────────────────────────

fn validate_routing(verbose: bool) -> Vec<TestResult> {
    println!("--- Routing ---");
    let mut results = Vec::new();
    let config = SimConfig::default();
    let topology = LevelSpec::office().build_topology(&config.nav);

    let cases = [
        ("same_room", 2, 2, Some(0)),
        ("office_to_hallway", 2, 3, Some(1)),
        ("break_to_classroom", 1, 4, Some(3)),
        ("meeting_to_break", 5, 1, Some(3)),
        ("unknown_room", 1, 99, None),
    ];
    for (name, from, to, hops) in cases {
        let route = topology.route(from, to);
        let got = route.as_ref().map(|r| r.len());
        if verbose {
            if let Some(r) = &route {
                let rooms: Vec<_> = r.iter().map(|d| d.to.to_string()).collect();
                println!("  {} -> {}: [{}]", from, to, rooms.join(" "));
            }
        }
        results.push(TestResult {
            name: format!("route_{}", name),
            passed: got == hops,
            detail: format!("{}→{} = {:?} hops", from, to, got),
        });
    }

    results
}

// ── 5. Scenarios ────────────────────────────────────────────────────────

fn run(sim: &mut Simulation, seconds: f32, dt: f32) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for _ in 0..(seconds / dt) as usize {
        sim.update(dt);
        events.extend(sim.drain_events());
        if sim.status() == SimStatus::Caught {
            break;
        }
    }
    events
}

fn validate_scenarios(verbose: bool) -> Vec<TestResult> {
    println!("--- Scenarios ---");
    let mut results = Vec::new();

    // Pursuer crosses two rooms and catches, for several seeds
    let spec = LevelSpec::linear(3).with_agent(
        "Jo-nathan",
        AgentKind::Pursuer,
        Place::new(3, Vec2::new(1000.0, 150.0)),
    );
    for seed in 0..5 {
        let config = SimConfig {
            seed,
            ..SimConfig::default()
        };
        let outcome = load(&spec, config).map(|mut sim| {
            let events = run(&mut sim, 80.0, 0.0625);
            let caught = events.iter().filter(|e| e.is_capture()).count();
            (caught, sim.sim_time())
        });
        results.push(TestResult {
            name: format!("pursuit_linear3_seed{}", seed),
            passed: matches!(outcome, Ok((1, _))),
            detail: match outcome {
                Ok((caught, t)) => format!("{} captures at {:.1}s", caught, t),
                Err(e) => e,
            },
        });
    }

    // Scavenger standing on the player never catches
    let mut scavenger = LevelSpec::linear(2);
    scavenger.agents.push(afterhours_core::level::AgentSpec {
        name: "NextGen Intern".into(),
        kind: AgentKind::Scavenger,
        room: 1,
        pos: scavenger.player.pos,
        patrol: vec![],
        desk: None,
        stash: Some(Place::new(2, Vec2::new(600.0, 150.0))),
    });
    let outcome = load(&scavenger, SimConfig::default()).map(|mut sim| {
        let events = run(&mut sim, 120.0, 0.1);
        let caught = events.iter().filter(|e| e.is_capture()).count();
        (caught, sim.signals().stock)
    });
    results.push(TestResult {
        name: "scavenger_harmless".into(),
        passed: matches!(outcome, Ok((0, stock)) if stock < 3),
        detail: match outcome {
            Ok((caught, stock)) => format!("{} captures, stock {}", caught, stock),
            Err(e) => e,
        },
    });

    // Slacking player is eventually caught by the monitor
    let monitor = LevelSpec::linear(2).with_agent(
        "Angellica",
        AgentKind::Monitor,
        Place::new(1, Vec2::new(300.0, 150.0)),
    );
    let outcome = load(&monitor, SimConfig::default()).map(|mut sim| {
        run(&mut sim, 120.0, 0.1).into_iter().find_map(|e| match e {
            SimEvent::PlayerCaught { cause, .. } => Some(cause),
            _ => None,
        })
    });
    results.push(TestResult {
        name: "monitor_catches_slacker".into(),
        passed: matches!(outcome, Ok(Some(Cause::CaughtSlacking))),
        detail: format!("{:?}", outcome),
    });

    // Full office with a diligent player: agents stay inside their rooms
    let outcome = load(&LevelSpec::office(), SimConfig::default()).map(|mut sim| {
        sim.signals_mut().productive = true;
        let events = run(&mut sim, 120.0, 1.0 / 30.0);
        let hops = events
            .iter()
            .filter(|e| matches!(e, SimEvent::RoomChanged { .. }))
            .count();
        let strays: Vec<String> = sim
            .snapshots()
            .into_iter()
            .filter(|a| {
                !sim.floor()
                    .room(a.room)
                    .is_some_and(|r| r.bounds.contains_point(a.position))
            })
            .map(|a| a.name)
            .collect();
        if verbose {
            for a in sim.snapshots() {
                println!(
                    "  {:<16} room {} {:>9} at ({:.0}, {:.0}) facing {}",
                    a.name,
                    a.room,
                    a.state,
                    a.position.x,
                    a.position.y,
                    a.facing.as_str()
                );
            }
        }
        (hops, strays)
    });
    results.push(TestResult {
        name: "office_agents_contained".into(),
        passed: matches!(&outcome, Ok((_, strays)) if strays.is_empty()),
        detail: match outcome {
            Ok((hops, strays)) if strays.is_empty() => format!("{} room changes", hops),
            Ok((_, strays)) => format!("outside their room: {}", strays.join(", ")),
            Err(e) => e,
        },
    });

    results
}

// ── 6. Configuration ────────────────────────────────────────────────────

fn validate_config(_verbose: bool) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let mut results = Vec::new();

    let round_trip = SimConfig::default()
        .to_json_string()
        .and_then(|json| SimConfig::from_json_str(&json));
    results.push(TestResult {
        name: "config_round_trip".into(),
        passed: round_trip.as_ref().is_ok_and(|c| *c == SimConfig::default()),
        detail: "default config survives JSON".into(),
    });

    let partial = SimConfig::from_json_str(r#"{ "agents": { "sprinter": { "sprint_speed": 250.0 } } }"#);
    results.push(TestResult {
        name: "config_partial_override".into(),
        passed: partial
            .as_ref()
            .is_ok_and(|c| c.agents.sprinter.sprint_speed == 250.0 && c.agents.sprinter.speed == 40.0),
        detail: "unspecified fields keep defaults".into(),
    });

    let bad = serde_json::from_str::<SimConfig>(r#"{ "seed": -1 }"#);
    results.push(TestResult {
        name: "config_rejects_bad_seed".into(),
        passed: bad.is_err(),
        detail: "negative seed is a parse error".into(),
    });

    results
}

// ── 7. Level file ───────────────────────────────────────────────────────

fn validate_level_file(path: &str) -> Vec<TestResult> {
    println!("--- Level File ---");
    let loaded = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| Simulation::from_json(&json, SimConfig::default()).map_err(|e| e.to_string()));
    if let Ok(sim) = &loaded {
        info!("{}: {} agents", path, sim.agent_count());
    }
    vec![TestResult {
        name: "level_file_loads".into(),
        passed: loaded.is_ok(),
        detail: match loaded {
            Ok(sim) => format!("{}: {} agents", path, sim.agent_count()),
            Err(e) => format!("{}: {}", path, e),
        },
    }]
}
