use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    devup completions bash > ~/.bash_completion.d/devup\n\n\
                  Generate zsh completions:\n    devup completions zsh > ~/.zfunc/_devup\n\n\
                  Generate fish completions:\n    devup completions fish > ~/.config/fish/completions/devup.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
