use anyhow::{bail, Result};
use clap::Parser;
use decldoc::{
    cli::Command,
    decl::{DeclKind, DeclNode},
    doc::{build_module, module::ExclusionFilter, ModuleBuild},
    search::{self, SearchIndex},
};
use decldoc_tracing::{
    init_tracing_subscriber, println_action_green, println_red_err, TracingSubscriberOptions,
};

/// Main method for `decldoc`.
pub fn main() -> Result<()> {
    let command = Command::parse();
    init_tracing_subscriber(TracingSubscriberOptions {
        verbosity: Some(command.verbose),
        silent: Some(command.silent),
        ..Default::default()
    });

    let modules = decldoc::load_program(&command.tree_path)?;
    let doc_path = decldoc::prepare_doc_path(&command.out_dir)?;
    let exclusions = ExclusionFilter::new(command.exclude.clone());

    let mut search_index = SearchIndex::default();
    let mut built = 0usize;
    for module in &modules {
        let name = module_name(module);
        println_action_green("Building", &format!("documentation for {name}"));
        // one module failing must not take its siblings down with it
        let outcome = build_module(module, &exclusions, &mut search_index).and_then(|build| {
            match build {
                ModuleBuild::Built(pages) => {
                    decldoc::write_pages(&pages, &doc_path)?;
                    Ok(true)
                }
                ModuleBuild::Excluded => Ok(false),
            }
        });
        match outcome {
            Ok(true) => built += 1,
            Ok(false) => {}
            Err(err) => println_red_err(&format!("failed to document {name}: {err:#}")),
        }
    }
    search::write_search_index(&doc_path, &search_index)?;
    println_action_green(
        "Finished",
        &format!("{built} module(s) documented at {}", doc_path.display()),
    );

    if command.open {
        if let Err(e) = opener::open(&doc_path) {
            bail!("Couldn't open docs: {}", e);
        }
    }

    Ok(())
}

fn module_name(node: &DeclNode) -> String {
    match &node.kind {
        DeclKind::Module(module) => module.package_path.join("."),
        _ => "<not a module>".to_owned(),
    }
}
