//! Reads a Smithy IDL file and prints its parsed statement list and any
//! diagnostics. A thin end-to-end exercise of the library, not a tool in its
//! own right — no flags, just a path.

use std::fs;
use std::process::ExitCode;

use smithy_syntax_core::{parse_idl, Document, StatementKind};

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: smithy-syntax-dump <file.smithy>");
        return ExitCode::FAILURE;
    };

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error reading {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let document = match Document::of(text) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("error loading {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = parse_idl(&document);

    println!("statements ({}):", result.statements.len());
    for (i, statement) in result.statements.iter().enumerate() {
        println!("  [{i}] {:>5}..{:<5} {}", statement.start(), statement.end(), describe(&statement.kind));
    }

    if result.errors.is_empty() {
        println!("\nno diagnostics");
    } else {
        println!("\ndiagnostics ({}):", result.errors.len());
        for error in result.errors.iter() {
            println!("  {}..{} {}", error.span.start, error.span.end, error.message());
        }
    }

    if !result.errors.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn describe(kind: &StatementKind) -> String {
    match kind {
        StatementKind::Incomplete => "Incomplete".to_string(),
        StatementKind::Control { key, .. } => format!("Control({key})"),
        StatementKind::Metadata { key, .. } => format!("Metadata({key})"),
        StatementKind::Namespace { name } => format!("Namespace({name})"),
        StatementKind::Use { id } => format!("Use({id})"),
        StatementKind::Apply { target } => format!("Apply({target})"),
        StatementKind::ShapeDef { shape_type, name } => format!("ShapeDef({shape_type} {name})"),
        StatementKind::ForResource { resource } => format!("ForResource({resource})"),
        StatementKind::Mixins { names } => format!("Mixins({})", names.join(", ")),
        StatementKind::TraitApplication { name, .. } => format!("TraitApplication({name})"),
        StatementKind::MemberDef { name, target, .. } => format!("MemberDef({name}: {target})"),
        StatementKind::EnumMemberDef { name, .. } => format!("EnumMemberDef({name})"),
        StatementKind::ElidedMemberDef { name } => format!("ElidedMemberDef({name})"),
        StatementKind::InlineMemberDef { name } => format!("InlineMemberDef({name})"),
        StatementKind::NodeMemberDef { name, .. } => format!("NodeMemberDef({name})"),
        StatementKind::Block { .. } => "Block".to_string(),
        StatementKind::Err { message } => format!("Err({message})"),
    }
}
