//! Terminal output macros that honour greppable and accessible modes.
//!
//! Greppable mode silences everything that is not machine-readable output;
//! accessible mode drops the coloured sigils that trip up screen readers.

/// Prints a general status line.
#[macro_export]
macro_rules! output {
    ($name:expr, $greppable:expr, $accessible:expr) => {
        if !$greppable {
            if $accessible {
                println!("{}", $name);
            } else {
                println!("{} {}", colored::Colorize::blue("[~]"), $name);
            }
        }
    };
}

/// Prints a warning line.
#[macro_export]
macro_rules! warning {
    ($name:expr, $greppable:expr, $accessible:expr) => {
        if !$greppable {
            if $accessible {
                println!("{}", $name);
            } else {
                println!("{} {}", colored::Colorize::red("[!]"), $name);
            }
        }
    };
}

/// Prints a detail line, one notch quieter than [`output!`].
#[macro_export]
macro_rules! detail {
    ($name:expr, $greppable:expr, $accessible:expr) => {
        if !$greppable {
            if $accessible {
                println!("{}", $name);
            } else {
                println!("{} {}", colored::Colorize::green("[>]"), $name);
            }
        }
    };
}
