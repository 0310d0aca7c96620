use std::fs;
use std::path::{Path, PathBuf};

use featheredge::cladding::{
    Cladding, GenerateOptions, GenerationRecord, SidingParams, StaggerMode, WarningPolicy,
    generate, regenerate,
};
use featheredge::geom::{FacePolygon, Frame, Vec3};
use serde::Deserialize;
use serde_json::{Value, json};

const USAGE: &str = r#"featheredge_cli

USAGE:
  featheredge_cli generate <job.json> [options]
  featheredge_cli regenerate <job.json> <record.json> [--set key=value]... [options]
  featheredge_cli defaults

JOB FILE:
  {
    "face": { "outer": [[x, y, z], ...], "holes": [[[x, y, z], ...], ...] },
    "reference_direction": [x, y, z],   (optional)
    "face_id": "wall-north",            (optional)
    "params": { ... }                   (optional, see `defaults`)
  }

OPTIONS:
  --out <path>          Write the layout JSON here instead of stdout
  --record <path>       Write the generation record (for `regenerate`)
  --accept-warnings     Generate even when parameter validation warns
  --flip                Reverse the board direction
  --stagger <mode>      Override stagger mode (none, half, random)
  --seed <n>            Override the stagger seed
  --set key=value       Parameter override for `regenerate` (value parsed as JSON)
  --overwrite           Overwrite existing output files
  -h, --help            Show this help

Logging goes to stderr; set RUST_LOG to change the level (default: info).
"#;

fn main() {
    if let Err(err) = run() {
        eprintln!("featheredge_cli error: {err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Deserialize)]
struct Job {
    face: FacePolygon,
    #[serde(default)]
    reference_direction: Option<Vec3>,
    #[serde(default)]
    face_id: Option<String>,
    #[serde(default)]
    params: SidingParams,
}

#[derive(Debug, Default)]
struct Options {
    out: Option<PathBuf>,
    record: Option<PathBuf>,
    accept_warnings: bool,
    flip: bool,
    stagger: Option<StaggerMode>,
    seed: Option<u64>,
    overrides: serde_json::Map<String, Value>,
    overwrite: bool,
}

fn run() -> Result<(), String> {
    init_logging()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut args = Args::new(args);

    let Some(command) = args.next() else {
        print_usage();
        return Ok(());
    };

    match command.as_str() {
        "generate" => cmd_generate(&mut args),
        "regenerate" => cmd_regenerate(&mut args),
        "defaults" => {
            let text = serde_json::to_string_pretty(&SidingParams::default())
                .map_err(|e| format!("serialize defaults: {e}"))?;
            println!("{text}");
            Ok(())
        }
        "-h" | "--help" | "help" => {
            print_usage();
            Ok(())
        }
        other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
    }
}

fn init_logging() -> Result<(), String> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| format!("init logging: {e}"))
}

fn print_usage() {
    println!("{USAGE}");
}

fn cmd_generate(args: &mut Args) -> Result<(), String> {
    let job_path = PathBuf::from(args.next().ok_or("missing job file")?);
    let options = parse_options(args)?;
    if !options.overrides.is_empty() {
        return Err("--set is only valid for `regenerate`".to_string());
    }

    let job = read_job(&job_path)?;
    let mut params = job.params.clone();
    if let Some(mode) = options.stagger {
        params.stagger_mode = mode;
    }
    if let Some(seed) = options.seed {
        params.seed = Some(seed);
    }

    let generate_options = generate_options(&job, &options, None);
    let cladding = generate(&job.face, &params, generate_options).map_err(|e| e.to_string())?;
    write_outputs(&cladding, &options)
}

fn cmd_regenerate(args: &mut Args) -> Result<(), String> {
    let job_path = PathBuf::from(args.next().ok_or("missing job file")?);
    let record_path = PathBuf::from(args.next().ok_or("missing record file")?);
    let mut options = parse_options(args)?;

    let job = read_job(&job_path)?;
    let text = fs::read_to_string(&record_path)
        .map_err(|e| format!("read {}: {e}", record_path.display()))?;
    let record = GenerationRecord::from_json(&text).map_err(|e| e.to_string())?;

    if let Some(mode) = options.stagger {
        options
            .overrides
            .insert("stagger_mode".to_string(), Value::String(mode.to_string()));
    }
    if let Some(seed) = options.seed {
        options.overrides.insert("seed".to_string(), json!(seed));
    }
    let overrides = Value::Object(options.overrides.clone());

    let restored = Frame::restore(&job.face, Some(&record.frame));
    let generate_options = generate_options(&job, &options, Some(restored));
    let cladding = regenerate(&job.face, &record, Some(&overrides), generate_options)
        .map_err(|e| e.to_string())?;
    write_outputs(&cladding, &options)
}

fn generate_options(job: &Job, options: &Options, frame: Option<Frame>) -> GenerateOptions {
    let frame = if options.flip {
        let base = frame.unwrap_or_else(|| Frame::new(&job.face, job.reference_direction));
        Some(base.flipped())
    } else {
        frame
    };
    GenerateOptions {
        reference_direction: job.reference_direction,
        frame,
        warning_policy: if options.accept_warnings {
            WarningPolicy::Accept
        } else {
            WarningPolicy::Reject
        },
        face_id: job.face_id.clone(),
    }
}

fn parse_options(args: &mut Args) -> Result<Options, String> {
    let mut options = Options::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => options.out = Some(PathBuf::from(args.value("--out")?)),
            "--record" => options.record = Some(PathBuf::from(args.value("--record")?)),
            "--accept-warnings" => options.accept_warnings = true,
            "--flip" => options.flip = true,
            "--overwrite" => options.overwrite = true,
            "--stagger" => {
                let value = args.value("--stagger")?;
                options.stagger = Some(value.parse().map_err(|e| format!("{e}"))?);
            }
            "--seed" => {
                let value = args.value("--seed")?;
                options.seed = Some(
                    value
                        .parse()
                        .map_err(|e| format!("invalid --seed `{value}`: {e}"))?,
                );
            }
            "--set" => {
                let value = args.value("--set")?;
                let (key, raw) = value
                    .split_once('=')
                    .ok_or_else(|| format!("--set expects key=value, got `{value}`"))?;
                let parsed =
                    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
                options.overrides.insert(key.trim().to_string(), parsed);
            }
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
        }
    }
    Ok(options)
}

fn read_job(path: &Path) -> Result<Job, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("parse {}: {e}", path.display()))
}

fn write_outputs(cladding: &Cladding, options: &Options) -> Result<(), String> {
    let layout = serde_json::to_string_pretty(&layout_json(cladding))
        .map_err(|e| format!("serialize layout: {e}"))?;
    match options.out.as_deref() {
        Some(path) => {
            write_text_file(path, &layout, options.overwrite)?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{layout}"),
    }

    if let Some(path) = options.record.as_deref() {
        let record = cladding.record().to_json().map_err(|e| e.to_string())?;
        write_text_file(path, &record, options.overwrite)?;
        eprintln!("wrote {}", path.display());
    }

    let boundary = &cladding.diagnostics.boundary;
    eprintln!(
        "{}: courses={} boards={} boundary={} removed={}",
        cladding.profile.definition_name(),
        cladding.courses.len(),
        cladding.boards.len(),
        boundary.boundary,
        boundary.removed
    );
    Ok(())
}

fn layout_json(cladding: &Cladding) -> Value {
    let resolved = &cladding.resolved;
    let courses: Vec<Value> = cladding
        .courses
        .iter()
        .map(|c| {
            json!({
                "index": c.index,
                "v0": c.v0,
                "v1": c.v1,
                "segments": c.segments,
                "outline": c.outline_world(&cladding.frame),
            })
        })
        .collect();
    let boards: Vec<Value> = cladding
        .boards
        .iter()
        .map(|b| {
            json!({
                "label": b.label(),
                "course_index": b.course_index,
                "start_u": b.start_u,
                "end_u": b.end_u,
                "v0": b.v0,
                "v1": b.v1,
                "scale": b.scale,
                "status": b.status,
                "transform": b.transform(&cladding.frame).as_matrix(),
            })
        })
        .collect();

    json!({
        "definition": cladding.profile.definition_name(),
        "material": resolved.material_name,
        "frame": cladding.frame.to_record(),
        "resolved": {
            "mode": resolved.mode,
            "step": resolved.step,
            "t_top": resolved.t_top,
            "t_bot": resolved.t_bot,
            "course_count": resolved.course_count,
            "seed": resolved.seed,
            "lod": resolved.lod,
        },
        "warnings": cladding.warnings,
        "courses": courses,
        "boards": boards,
    })
}

fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
    if path.exists() && !overwrite {
        return Err(format!(
            "refusing to overwrite existing file {} (pass --overwrite)",
            path.display()
        ));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| format!("create {}: {e}", parent.display()))?;
    }
    fs::write(path, text).map_err(|e| format!("write {}: {e}", path.display()))
}

struct Args {
    args: Vec<String>,
    pos: usize,
}

impl Args {
    fn new(args: Vec<String>) -> Self {
        Self { args, pos: 0 }
    }

    fn next(&mut self) -> Option<String> {
        let arg = self.args.get(self.pos)?.clone();
        self.pos += 1;
        Some(arg)
    }

    fn value(&mut self, flag: &str) -> Result<String, String> {
        self.next()
            .ok_or_else(|| format!("missing value for {flag}"))
    }
}
