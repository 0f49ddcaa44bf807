use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::debug;
use serde_json::Value as JsonValue;
use swade_core::ParserTables;
use swade_core::core_api::{Engine, SheetFormat};
use swade_render::{
    FieldSelection, JsonStyle, TextStyle, render_json_full, render_json_selected, render_text,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Saved character page or sheet text; `-` reads stdin.
    #[arg(value_name = "SHEET")]
    path: PathBuf,
    #[arg(long, value_name = "html|text", value_parser = parse_sheet_format)]
    format: Option<SheetFormat>,
    #[arg(long, conflicts_with_all = ["format", "text"])]
    html: bool,
    #[arg(long, conflicts_with = "format")]
    text: bool,
    /// JSON file overriding the built-in lookup tables.
    #[arg(long, value_name = "PATH")]
    tables: Option<PathBuf>,
    #[arg(long)]
    json: bool,
    #[arg(short, long)]
    verbose: bool,
    #[arg(long)]
    name: bool,
    #[arg(long = "wild-card")]
    wild_card: bool,
    #[arg(long)]
    description: bool,
    #[arg(long)]
    race: bool,
    #[arg(long = "type")]
    kind: bool,
    #[arg(long)]
    rank: bool,
    #[arg(long)]
    gender: bool,
    #[arg(long)]
    profession: bool,
    #[arg(long)]
    background: bool,
    #[arg(long)]
    attributes: bool,
    #[arg(long)]
    skills: bool,
    #[arg(long)]
    pace: bool,
    #[arg(long)]
    parry: bool,
    #[arg(long)]
    toughness: bool,
    #[arg(long)]
    size: bool,
    #[arg(long)]
    weapons: bool,
    #[arg(long)]
    armor: bool,
    #[arg(long)]
    edges: bool,
    #[arg(long)]
    hindrances: bool,
    #[arg(long)]
    gear: bool,
    #[arg(long)]
    languages: bool,
    #[arg(long = "special-abilities")]
    special_abilities: bool,
    #[arg(long)]
    advances: bool,
    #[arg(long)]
    cybertech: bool,
    #[arg(long)]
    vehicles: bool,
    #[arg(long)]
    powers: bool,
    #[arg(long)]
    arcane: bool,
    #[arg(long, visible_alias = "xp")]
    experience: bool,
    #[arg(long)]
    bennies: bool,
    #[arg(long)]
    wealth: bool,
}

impl Cli {
    fn fields(&self) -> FieldSelection {
        FieldSelection {
            name: self.name,
            description: self.description,
            race: self.race,
            kind: self.kind,
            rank: self.rank,
            gender: self.gender,
            profession: self.profession,
            background: self.background,
            wild_card: self.wild_card,
            attributes: self.attributes,
            skills: self.skills,
            pace: self.pace,
            parry: self.parry,
            toughness: self.toughness,
            size: self.size,
            weapons: self.weapons,
            armor: self.armor,
            edges: self.edges,
            hindrances: self.hindrances,
            gear: self.gear,
            languages: self.languages,
            special_abilities: self.special_abilities,
            advances: self.advances,
            cybertech: self.cybertech,
            vehicles: self.vehicles,
            powers: self.powers,
            arcane: self.arcane,
            experience: self.experience,
            bennies: self.bennies,
            wealth: self.wealth,
        }
    }

    fn format_hint(&self) -> Option<SheetFormat> {
        self.format.or(if self.html {
            Some(SheetFormat::Markup)
        } else if self.text {
            Some(SheetFormat::PlainText)
        } else {
            None
        })
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let fields = cli.fields();

    let engine = match &cli.tables {
        Some(path) => Engine::with_tables(load_tables(path)),
        None => Engine::new(),
    };

    let bytes = read_input(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", cli.path.display());
        process::exit(1);
    });

    let sheet = engine
        .open_bytes(bytes, cli.format_hint())
        .unwrap_or_else(|e| {
            eprintln!("Error parsing sheet: {}", cli.path.display());
            eprintln!("  {}", e);
            process::exit(1);
        });
    for issue in &sheet.issues {
        eprintln!("warning: {issue}");
    }

    if cli.json {
        let json = if fields.is_any_selected() {
            render_json_selected(&sheet, &fields, JsonStyle::CanonicalV1)
        } else {
            render_json_full(&sheet, JsonStyle::CanonicalV1)
        };
        let rendered = serde_json::to_string_pretty(&json).unwrap_or_else(|e| {
            eprintln!("Error rendering JSON output: {e}");
            process::exit(1);
        });
        println!("{rendered}");
        return;
    }

    if fields.is_any_selected() {
        if let JsonValue::Object(map) =
            render_json_selected(&sheet, &fields, JsonStyle::CanonicalV1)
        {
            for (key, value) in &map {
                println!("{key}={}", flat_value(value));
            }
        }
        return;
    }

    print!("{}", render_text(&sheet, TextStyle::StatBlock));
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn load_tables(path: &Path) -> ParserTables {
    let raw = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", path.display());
        process::exit(1);
    });
    let tables = ParserTables::from_json_str(&raw).unwrap_or_else(|e| {
        eprintln!("Error loading tables from {}: {e}", path.display());
        process::exit(1);
    });
    debug!("loaded parser tables from {}", path.display());
    tables
}

fn read_input(path: &Path) -> io::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::Read::read_to_end(&mut io::stdin().lock(), &mut buf)?;
        Ok(buf)
    } else {
        fs::read(path)
    }
}

/// One-line form of a rendered field for `key=value` output.
fn flat_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => items
            .iter()
            .map(flat_value)
            .collect::<Vec<_>>()
            .join(", "),
        JsonValue::Object(m) => match (m.get("name"), m.get("die")) {
            (Some(JsonValue::String(name)), Some(JsonValue::String(die))) => {
                format!("{name} {die}")
            }
            (Some(JsonValue::String(name)), _) => name.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}

fn parse_sheet_format(value: &str) -> Result<SheetFormat, String> {
    value.parse::<SheetFormat>().map_err(|e| e.message)
}
