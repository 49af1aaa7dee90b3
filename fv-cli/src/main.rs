//! fv: CLI for factored function files.
//!
//! Subcommands:
//! - info
//! - eval
//! - scale

use std::env;
use std::fmt::Display;
use std::process;
use std::str::FromStr;

use fv_basis::{
    matrix_from_config, matrix_to_config, vector_from_config, vector_to_config, Factored2DMatrix,
    FactoredVector,
};
use fv_core::{is_valid_assignment, FunctionConfig};
use fv_logging::{
    hash_config_bytes, now_ms, EvalEventV1, NdjsonWriter, ScaleEventV1, VersionInfoV1,
};
use nalgebra::DVector;

fn die(msg: impl Display) -> ! {
    eprintln!("{msg}");
    process::exit(1);
}

/// Parse a comma-separated list such as `1,0,2` or `2.0,0.5`.
fn parse_list<T: FromStr>(s: &str) -> Result<Vec<T>, String> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .map(|p| {
            p.trim()
                .parse::<T>()
                .map_err(|_| format!("invalid list element: {:?}", p))
        })
        .collect()
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i + 1) {
        Some(v) => v.as_str(),
        None => die(format!("Missing value for {flag}")),
    }
}

fn flag_list<T: FromStr>(args: &[String], i: usize, flag: &str) -> Vec<T> {
    let raw = flag_value(args, i, flag);
    parse_list(raw).unwrap_or_else(|e| die(format!("Invalid {flag} value: {e}")))
}

/// A function file loaded and validated, plus the hash of its bytes.
struct Loaded {
    config: FunctionConfig,
    config_hash: String,
    v: FactoredVector,
    q: Factored2DMatrix,
}

fn load(path: &str) -> Loaded {
    let contents = std::fs::read_to_string(path)
        .unwrap_or_else(|e| die(format!("Failed to read {path}: {e}")));
    let config = FunctionConfig::from_yaml(&contents)
        .unwrap_or_else(|e| die(format!("Failed to load config: {e}")));
    let v = vector_from_config(&config).unwrap_or_else(|e| die(format!("Invalid bases: {e}")));
    let q = matrix_from_config(&config).unwrap_or_else(|e| die(format!("Invalid q_bases: {e}")));
    Loaded {
        config,
        config_hash: hash_config_bytes(contents.as_bytes()),
        v,
        q,
    }
}

fn check_weights(label: &str, w: &[f64], n_bases: usize) {
    if w.len() != n_bases && w.len() != n_bases + 1 {
        die(format!(
            "{label} has {} values; expected {} (or {} with a bias)",
            w.len(),
            n_bases,
            n_bases + 1
        ));
    }
}

fn cmd_info(args: &[String]) {
    let mut config_path: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"fv info

USAGE:
    fv info --config f.yaml

OPTIONS:
    --config PATH   Function file (required)
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(flag_value(args, i, "--config").to_string());
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `fv info`: {}", other);
                eprintln!("Run `fv info --help` for usage.");
                process::exit(1);
            }
        }
    }

    let Some(config_path) = config_path else {
        die("Missing --config");
    };
    let l = load(&config_path);

    println!("config_hash: {}", l.config_hash);
    println!("state_space: {:?}", l.config.state_space);
    println!("action_space: {:?}", l.config.action_space);
    println!("bases: {}", l.v.len());
    for (i, b) in l.v.bases().iter().enumerate() {
        println!("  [{i}] scope={:?} size={}", b.tag, b.values.len());
    }
    println!("q_bases: {}", l.q.len());
    for (i, b) in l.q.bases().iter().enumerate() {
        println!(
            "  [{i}] state_scope={:?} action_scope={:?} shape={}x{}",
            b.tag,
            b.action_tag,
            b.values.nrows(),
            b.values.ncols()
        );
    }
}

fn cmd_eval(args: &[String]) {
    let mut config_path: Option<String> = None;
    let mut state: Option<Vec<usize>> = None;
    let mut action: Option<Vec<usize>> = None;
    let mut weights: Option<Vec<f64>> = None;
    let mut q_weights: Option<Vec<f64>> = None;
    let mut log_path: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"fv eval

USAGE:
    fv eval --config f.yaml --state 1,0 [--action 0] [--weights 2,0.5[,bias]] [--q-weights w..] [--log events.ndjson]

OPTIONS:
    --config PATH      Function file (required)
    --state LIST       Full state assignment, comma separated (required)
    --action LIST      Full action assignment; enables Q evaluation
    --weights LIST     Coefficients for `bases`, optionally followed by a bias
    --q-weights LIST   Coefficients for `q_bases`, optionally followed by a bias
    --log PATH         Append an NDJSON eval event to PATH
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(flag_value(args, i, "--config").to_string());
                i += 2;
            }
            "--state" => {
                state = Some(flag_list(args, i, "--state"));
                i += 2;
            }
            "--action" => {
                action = Some(flag_list(args, i, "--action"));
                i += 2;
            }
            "--weights" => {
                weights = Some(flag_list(args, i, "--weights"));
                i += 2;
            }
            "--q-weights" => {
                q_weights = Some(flag_list(args, i, "--q-weights"));
                i += 2;
            }
            "--log" => {
                log_path = Some(flag_value(args, i, "--log").to_string());
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `fv eval`: {}", other);
                eprintln!("Run `fv eval --help` for usage.");
                process::exit(1);
            }
        }
    }

    let Some(config_path) = config_path else {
        die("Missing --config");
    };
    let Some(state) = state else {
        die("Missing --state");
    };
    let l = load(&config_path);
    let space = &l.config.state_space;
    let actions = &l.config.action_space;

    if !is_valid_assignment(space, &state) {
        die(format!("--state {:?} is not an assignment of {:?}", state, space));
    }
    if let Some(a) = &action {
        if !is_valid_assignment(actions, a) {
            die(format!("--action {:?} is not an assignment of {:?}", a, actions));
        }
    }

    if weights.is_some() && l.v.is_empty() {
        die("--weights given but the file has no `bases`");
    }
    if q_weights.is_some() && l.q.is_empty() {
        die("--q-weights given but the file has no `q_bases`");
    }
    if q_weights.is_some() && action.is_none() {
        die("--q-weights requires --action");
    }

    let value = if l.v.is_empty() {
        None
    } else {
        Some(match &weights {
            Some(w) => {
                check_weights("--weights", w, l.v.len());
                l.v.get_weighted_value(space, &state, &DVector::from_column_slice(w))
            }
            None => l.v.get_value(space, &state),
        })
    };

    let q_value = match (&action, l.q.is_empty()) {
        (Some(a), false) => Some(match &q_weights {
            Some(w) => {
                check_weights("--q-weights", w, l.q.len());
                let w = DVector::from_column_slice(w);
                l.q.get_weighted_value(space, actions, &state, a, &w)
            }
            None => l.q.get_value(space, actions, &state, a),
        }),
        _ => None,
    };

    if let Some(v) = value {
        println!("V = {v}");
    }
    if let Some(q) = q_value {
        println!("Q = {q}");
    }
    if value.is_none() && q_value.is_none() {
        eprintln!("Nothing to evaluate (no bases, or q_bases without --action).");
    }

    if let Some(log_path) = log_path {
        let event = EvalEventV1 {
            event: "eval".to_string(),
            ts_ms: now_ms(),
            v: VersionInfoV1::current(),
            config_hash: l.config_hash,
            state,
            action,
            weights,
            q_weights,
            value,
            q_value,
        };
        let mut w = NdjsonWriter::open_append(&log_path)
            .unwrap_or_else(|e| die(format!("Failed to open log {log_path}: {e}")));
        if let Err(e) = w.write_event(&event).and_then(|_| w.flush()) {
            die(format!("Failed to write log {log_path}: {e}"));
        }
    }
}

fn cmd_scale(args: &[String]) {
    let mut config_path: Option<String> = None;
    let mut out: Option<String> = None;
    let mut weights: Option<Vec<f64>> = None;
    let mut q_weights: Option<Vec<f64>> = None;
    let mut scalar: Option<f64> = None;
    let mut log_path: Option<String> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"fv scale

USAGE:
    fv scale --config f.yaml --out g.yaml (--weights w.. | --q-weights w.. | --scalar c) [--log events.ndjson]

OPTIONS:
    --config PATH      Function file (required)
    --out PATH         Where to write the scaled function (required)
    --weights LIST     Scale `bases`; a trailing bias is folded into the tables
    --q-weights LIST   Scale `q_bases`; a trailing bias is folded into the tables
    --scalar C         Scale every table by C (applied after any weights)
    --log PATH         Append an NDJSON scale event to PATH
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(flag_value(args, i, "--config").to_string());
                i += 2;
            }
            "--out" => {
                out = Some(flag_value(args, i, "--out").to_string());
                i += 2;
            }
            "--weights" => {
                weights = Some(flag_list(args, i, "--weights"));
                i += 2;
            }
            "--q-weights" => {
                q_weights = Some(flag_list(args, i, "--q-weights"));
                i += 2;
            }
            "--scalar" => {
                let raw = flag_value(args, i, "--scalar");
                scalar = Some(
                    raw.parse()
                        .unwrap_or_else(|_| die(format!("Invalid --scalar value: {raw}"))),
                );
                i += 2;
            }
            "--log" => {
                log_path = Some(flag_value(args, i, "--log").to_string());
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `fv scale`: {}", other);
                eprintln!("Run `fv scale --help` for usage.");
                process::exit(1);
            }
        }
    }

    let Some(config_path) = config_path else {
        die("Missing --config");
    };
    let Some(out) = out else {
        die("Missing --out");
    };
    if weights.is_none() && q_weights.is_none() && scalar.is_none() {
        die("Nothing to do: pass --weights, --q-weights or --scalar");
    }

    let Loaded {
        mut config,
        config_hash,
        mut v,
        mut q,
    } = load(&config_path);

    if let Some(w) = &weights {
        check_weights("--weights", w, v.len());
        v *= &DVector::from_column_slice(w);
    }
    if let Some(w) = &q_weights {
        check_weights("--q-weights", w, q.len());
        q *= &DVector::from_column_slice(w);
    }
    if let Some(c) = scalar {
        v *= c;
        q *= c;
    }

    config.bases = vector_to_config(&v);
    config.q_bases = matrix_to_config(&q);
    let yaml = config
        .to_yaml()
        .unwrap_or_else(|e| die(format!("Failed to serialize result: {e}")));
    if let Err(e) = config.save(&out) {
        die(format!("Failed to write {out}: {e}"));
    }
    println!("Wrote {out} ({} bases, {} q_bases)", v.len(), q.len());

    if let Some(log_path) = log_path {
        let event = ScaleEventV1 {
            event: "scale".to_string(),
            ts_ms: now_ms(),
            v: VersionInfoV1::current(),
            config_hash,
            out_hash: hash_config_bytes(yaml.as_bytes()),
            out_path: out,
            weights,
            q_weights,
            scalar,
            num_bases: v.len() as u64,
            num_q_bases: q.len() as u64,
        };
        let mut w = NdjsonWriter::open_append(&log_path)
            .unwrap_or_else(|e| die(format!("Failed to open log {log_path}: {e}")));
        if let Err(e) = w.write_event(&event).and_then(|_| w.flush()) {
            die(format!("Failed to write log {log_path}: {e}"));
        }
    }
}

fn print_help() {
    eprintln!(
        r#"fv - factored value function tool

USAGE:
    fv <COMMAND> [OPTIONS]

COMMANDS:
    info        Describe a function file
    eval        Evaluate V(x) and/or Q(x, a), optionally weighted
    scale       Scale a function file in place and write the result

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version

Run `fv <COMMAND> --help` for command options.
"#
    );
}

fn print_version() {
    println!("fv {}", env!("CARGO_PKG_VERSION"));
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        process::exit(1);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => print_help(),
        "-V" | "--version" => print_version(),
        "info" => cmd_info(&args[2..]),
        "eval" => cmd_eval(&args[2..]),
        "scale" => cmd_scale(&args[2..]),
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Run `fv --help` for usage.");
            process::exit(1);
        }
    }
}
