use vergen_gitcl::{Emitter, Gitcl};

// Embeds VERGEN_GIT_{BRANCH,SHA,DIRTY} for src/version.rs. Outside a git
// checkout vergen warns and emits placeholder values instead of failing.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let git = Gitcl::builder().branch(true).sha(true).dirty(true).build();

    Emitter::default().add_instructions(&git)?.emit()?;

    Ok(())
}
