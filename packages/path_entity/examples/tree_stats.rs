//! Walks a directory tree and prints how many files and directories it holds and how large the
//! files are in total.
//!
//! Usage: `cargo run --example tree_stats -- [path]` (defaults to the current directory).

use std::env;

use path_entity::{PathEntity, WalkDirective, WalkEvent};

fn main() {
    let root = env::args().nth(1).unwrap_or_else(|| ".".to_owned());
    let mut root = PathEntity::new(root);

    let mut files = 0_u64;
    let mut directories = 0_u64;
    let mut bytes = 0_u64;
    let mut unreadable = Vec::new();

    let result = root.walk_dir(|event, entity, error| match event {
        WalkEvent::EnterDir => {
            directories = directories.saturating_add(1);
            WalkDirective::Enter
        }
        WalkEvent::File => {
            files = files.saturating_add(1);
            bytes = bytes.saturating_add(entity.length());
            WalkDirective::Ok
        }
        WalkEvent::LeaveDir => {
            if let Some(error) = error {
                unreadable.push(format!("{entity}: {error}"));
            }
            WalkDirective::Ok
        }
    });

    if result == WalkDirective::Nok {
        println!("{root} is neither a file nor a directory");
        return;
    }

    println!("{}", root.canonical_path().display());
    println!("  {directories} directories, {files} files, {bytes} bytes");

    for line in unreadable {
        println!("  cannot list {line}");
    }
}
