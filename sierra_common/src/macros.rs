/*
 * Copyright © 2026, the SierraVision project contributors.
 *
 * The "SierraVision" software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! macros used across SierraVision crates

/* #region error definition ******************************************************************/

/// syntactic sugar macro to define thiserror Error enums:
/// ```
/// # use sierra_common::define_error;
/// define_error!{ pub SierraNetError =
///   IOError( #[from] std::io::Error ) : "IO error: {0}",
///   OpFailed(String) : "operation failed: {0}"
/// }
/// ```
/// expands into a `#[derive(thiserror::Error,Debug)]` enum with one `#[error(..)]`
/// attribute per variant
#[macro_export]
macro_rules! define_error {
    ($vis:vis $name:ident = $( $err_variant:ident ( $( $( #[$meta:meta] )? $field_type:ty),* ) : $msg_lit:literal ),*) => {
        #[derive(thiserror::Error,Debug)]
        $vis enum $name {
            $(
                #[error($msg_lit)]
                $err_variant ( $( $(#[$meta])? $field_type ),*  )
            ),*
        }
    }
}

/// create a std::io::Error with a formatted message:
/// `io_error!(NotFound, "no such slot: {}", key)`
#[macro_export]
macro_rules! io_error {
    ( $kind:ident, $fmt:literal $(, $($arg:expr),* )? ) =>
    {
        std::io::Error::new( std::io::ErrorKind::$kind, format!($fmt, $( $($arg),* )?).as_str())
    }
}

/* #endregion error definition */

/* #region define_cli ************************************************************************/

/// define a lazy_static CLI option struct from structopt attributes:
/// ```ignore
/// define_cli! { ARGS [about="fetch imagery"] =
///     refresh: bool [long],
///     region: String [long,default_value="sierra_madre"]
/// }
/// ...
/// if ARGS.refresh { ... }
/// ```
#[macro_export]
macro_rules! define_cli {
    ($name:ident [ $( $sopt:ident $(= $sx:expr)? ),* ] = $( $( #[$meta:meta] )? $fname:ident : $ftype:ty [ $( $fopt:ident $(= $fx:expr)?),* ] ),* ) => {
        use structopt::StructOpt;
        use lazy_static::lazy_static;

        #[derive(StructOpt)]
        #[structopt( $( $sopt $(=$sx)? ),* )]
        struct CliOpts {
            $(
                #[structopt( $( $fopt $(=$fx)? ),* )]
                $(#[$meta])?
                $fname : $ftype,
            )*
        }
        lazy_static! { static ref $name: CliOpts = CliOpts::from_args(); }
    }
}

/* #endregion define_cli */
