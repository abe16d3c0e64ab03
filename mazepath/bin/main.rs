use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use mazepath::{
    check_bounds, stream_solve,
    util::{load_img, DEFAULT_THRESHOLD},
    Maze, PathFinder, PathFinderState, Point, SolveEvent, SolveRequest,
};

/// Find the shortest path through a grid maze
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Text maze, JSON solve request (.json) or image (.png, .bmp, .jpg, .jpeg, .gif)
    input: PathBuf,

    /// Start cell as `row,col`, replaces the one given in the input
    #[arg(long)]
    start: Option<Point>,

    /// Goal cell as `row,col`, replaces the one given in the input
    #[arg(long)]
    goal: Option<Point>,

    /// Image pixels darker than this are walls
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Print the result as a JSON response
    #[arg(long, conflicts_with = "events")]
    json: bool,

    /// Print each visited cell and then the result as JSON lines
    #[arg(long)]
    events: bool,

    /// Also print the number of moves to every visited cell
    #[arg(long, conflicts_with_all = ["json", "events"])]
    costs: bool,
}

/// Read the input into a request, keeping the labeled maze around when there is one
fn load(args: &Args) -> anyhow::Result<(SolveRequest, Option<Maze>)> {
    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let read = || {
        fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()))
    };

    match extension.as_deref() {
        Some("json") => {
            let mut request: SolveRequest = serde_json::from_str(&read()?)
                .with_context(|| format!("{} is not a solve request", args.input.display()))?;
            request.start = args.start.unwrap_or(request.start);
            request.goal = args.goal.unwrap_or(request.goal);
            Ok((request, None))
        }
        Some("png" | "bmp" | "jpg" | "jpeg" | "gif") => {
            let grid = load_img(&args.input, args.threshold)?;
            let request = SolveRequest {
                grid,
                start: args.start.context("--start is required for image input")?,
                goal: args.goal.context("--goal is required for image input")?,
            };
            Ok((request, None))
        }
        _ => {
            let mut maze: Maze = read()?
                .parse()
                .with_context(|| format!("failed to parse maze {}", args.input.display()))?;
            maze.start = args.start.unwrap_or(maze.start);
            maze.goal = args.goal.unwrap_or(maze.goal);
            Ok((SolveRequest::from(maze.clone()), Some(maze)))
        }
    }
}

fn write_event(out: &mut impl Write, event: &SolveEvent) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, event)?;
    writeln!(out)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let (request, maze) = load(&args)?;
    if !request.grid.is_rectangular() {
        warn!("grid rows have different lengths, cells past the end of a row are walls");
    }
    info!(
        "solving {}x{} grid from {} to {}",
        request.grid.rows(),
        request.grid.columns(),
        request.start,
        request.goal
    );

    let mut out = io::stdout().lock();

    if args.events {
        // keep the first write error and report it once the search is done
        let mut write_error = None;
        stream_solve(&request, |event| {
            if write_error.is_none() {
                write_error = write_event(&mut out, &event).err();
            }
        })?;
        return write_error.map_or(Ok(()), Err);
    }

    if args.json {
        let response = request.solve()?;
        serde_json::to_writer_pretty(&mut out, &response)?;
        writeln!(out)?;
        return Ok(());
    }

    check_bounds(&request.grid, request.start, request.goal)?;

    let mut finder = PathFinder::new(&request.grid, request.start, request.goal);
    while !finder.state().is_done() {
        finder.step(&request.grid, |_| {});
    }

    match finder.state() {
        PathFinderState::PathFound(result) => {
            info!(
                "found a path of {} moves after visiting {} cells",
                result.total_cost, result.visited
            );
            match &maze {
                Some(maze) => write!(out, "{}", maze.render(Some(&result.path)))?,
                None => {
                    for point in &result.path {
                        writeln!(out, "{},{}", point.row, point.col)?;
                    }
                }
            }
            writeln!(out, "moves: {}", result.total_cost)?;
        }
        _ => writeln!(out, "no path from {} to {}", finder.start(), finder.goal())?,
    }

    if args.costs {
        write!(out, "{}", finder.get_visited())?;
    }

    Ok(())
}
