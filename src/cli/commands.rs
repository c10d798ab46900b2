//! Command dispatch: read JSON, run a conversion, write JSON

use std::io::{self, Read};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, InputArgs, LinkArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::record::{as_record, records_from_values, records_into_values};
use crate::domain::{
    BuildOptions, CartesianAssembler, DepthFirstLeveler, FillMode, FlattenOptions, LevelOptions,
    TreeBuilder, TreeFlattener, TreeNodeConvert,
};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Commands::Completion { shell } = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let compact = cli.compact;

    match &cli.command {
        Commands::Assemble {
            fill,
            no_fill,
            input,
        } => cmd_assemble(fill_mode(*fill, *no_fill, &settings), input, compact),
        Commands::Tree {
            links,
            child_field,
            render,
            label,
            input,
        } => {
            let mut options = BuildOptions::from(&settings);
            apply_links(links, &mut options.parent_id, &mut options.root_id);
            override_field(&mut options.parent_field, &links.parent_field);
            override_field(&mut options.id_field, &links.id_field);
            override_field(&mut options.child_field, child_field);
            let render_label = render.then_some(label.as_str());
            cmd_tree(options, render_label, input, compact)
        }
        Commands::Flatten {
            child_field,
            id_field,
            parent_id_field,
            root_id,
            input,
        } => {
            let mut options = FlattenOptions::from(&settings);
            override_field(&mut options.child_field, child_field);
            override_field(&mut options.id_field, id_field);
            override_field(&mut options.parent_id_field, parent_id_field);
            if let Some(root_id) = root_id {
                options.root_id = *root_id;
            }
            cmd_flatten(options, input, compact)
        }
        Commands::Level {
            links,
            indent,
            level_field,
            indent_field,
            input,
        } => {
            let mut options = LevelOptions::from(&settings);
            apply_links(links, &mut options.parent_id, &mut options.root_id);
            override_field(&mut options.parent_field, &links.parent_field);
            override_field(&mut options.id_field, &links.id_field);
            override_field(&mut options.indent_token, indent);
            override_field(&mut options.level_field, level_field);
            override_field(&mut options.indent_field, indent_field);
            cmd_level(options, input, compact)
        }
        Commands::Config { command } => cmd_config(command, &settings),
        Commands::Completion { .. } => Ok(()),
    }
}

/// `--root-id` moves the start point along with it unless `--parent-id` is given.
fn apply_links(links: &LinkArgs, parent_id: &mut i64, root_id: &mut i64) {
    if let Some(root) = links.root_id {
        *root_id = root;
        *parent_id = root;
    }
    if let Some(parent) = links.parent_id {
        *parent_id = parent;
    }
}

/// `--fill` and `--no-fill` win over the `fill` setting.
fn fill_mode(fill: bool, no_fill: bool, settings: &Settings) -> FillMode {
    match (fill, no_fill) {
        (true, _) => FillMode::Extend,
        (_, true) => FillMode::Truncate,
        _ => settings.fill_mode(),
    }
}

fn override_field(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

#[instrument(level = "debug")]
fn cmd_assemble(mode: FillMode, input: &InputArgs, compact: bool) -> CliResult<()> {
    let value = read_input(input.file.as_deref())?;
    let form = as_record(&value, 0)?;
    let rows = CartesianAssembler::new(mode).assemble(form);
    write_output(&Value::Array(records_into_values(rows)), compact)
}

#[instrument(level = "debug")]
fn cmd_tree(
    options: BuildOptions,
    render_label: Option<&str>,
    input: &InputArgs,
    compact: bool,
) -> CliResult<()> {
    let value = read_input(input.file.as_deref())?;
    let records = records_from_values(expect_array(&value)?)?;
    let builder = TreeBuilder::new(options);

    if let Some(label) = render_label {
        let arena = builder.build_arena(&records)?;
        output::info(&arena.to_tree_string(".", label));
        output::detail(&format!(
            "{} nodes, depth {}, {} leaves",
            arena.len(),
            arena.depth(),
            arena.leaf_ids().len()
        ));
        return Ok(());
    }

    let tree = builder.build(&records)?;
    write_output(&Value::Array(records_into_values(tree)), compact)
}

#[instrument(level = "debug")]
fn cmd_flatten(options: FlattenOptions, input: &InputArgs, compact: bool) -> CliResult<()> {
    let value = read_input(input.file.as_deref())?;
    let nodes = match value {
        Value::Array(nodes) => nodes,
        single @ Value::Object(_) => vec![single],
        other => return Err(CliError::InvalidInput(describe("an array or object", &other))),
    };
    let flat = TreeFlattener::new(options).flatten(&nodes)?;
    write_output(&Value::Array(records_into_values(flat)), compact)
}

#[instrument(level = "debug")]
fn cmd_level(options: LevelOptions, input: &InputArgs, compact: bool) -> CliResult<()> {
    let value = read_input(input.file.as_deref())?;
    let records = records_from_values(expect_array(&value)?)?;
    let rows = DepthFirstLeveler::new(options).level(&records)?;
    write_output(&Value::Array(records_into_values(rows)), compact)
}

fn cmd_config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available on this platform"),
        },
    }
    Ok(())
}

/// Read JSON from `file`, or stdin if none is given.
fn read_input(file: Option<&Path>) -> CliResult<Value> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Input {
            path: path.to_path_buf(),
            source,
        })?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    debug!("read {} bytes of input", text.len());
    Ok(serde_json::from_str(&text)?)
}

fn expect_array(value: &Value) -> CliResult<&[Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| CliError::InvalidInput(describe("an array of records", value)))
}

fn describe(expected: &str, value: &Value) -> String {
    format!(
        "expected {}, got {}",
        expected,
        crate::domain::record::value_kind(value)
    )
}

fn write_output(value: &Value, compact: bool) -> CliResult<()> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    output::info(&text);
    Ok(())
}
