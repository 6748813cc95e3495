//! Top level reporter configuration

use clap::{App, ArgMatches};

/// Command line configuration for a reporting run.
///
/// Reporters read their own arguments out of [`TapOptions::opts`]; the
/// arguments themselves are contributed by [`ExtraOptionsFunc`] hooks.
pub struct TapOptions {
    /// Command line arguments passed to this run
    pub opts: ArgMatches<'static>,
}

impl TapOptions {
    /// Create options from a default set of command line arguments.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_app(App::new("Tapir"))
    }

    /// Create options from custom command line arguments. Any registered
    /// [`ExtraOptionsFunc`]s will be added to `app`.
    pub fn with_app(app: App<'static, '_>) -> anyhow::Result<Self> {
        Self::with_app_from(app, &mut std::env::args_os())
    }

    /// As `with_app`, but allows you to specify the command line yourself.
    pub fn with_app_from<I, T>(mut app: App<'static, '_>, iter: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        for extra in inventory::iter::<ExtraOptionsFunc>() {
            app = (extra.make_options)(app);
        }

        let opts = app.get_matches_from_safe(iter)?;
        Ok(TapOptions { opts })
    }
}

/// A hook that can add command line arguments. Reporters use this to
/// define the arguments they read out of [`TapOptions`].
///
/// Examples:
///
/// ```
/// use clap::{App, Arg};
/// use tapir::ExtraOptionsFunc;
///
/// fn my_hook<'a>(app: App<'static, 'a>) -> App<'static, 'a> {
///     app.arg(Arg::with_name("my_option")
///             .long("my_option")
///             .takes_value(true))
/// }
/// inventory::submit! { ExtraOptionsFunc::from(my_hook) }
/// ```
pub struct ExtraOptionsFunc {
    make_options: Box<dyn for<'a> Fn(App<'static, 'a>) -> App<'static, 'a>>,
}

impl<F> From<F> for ExtraOptionsFunc
where
    F: for<'a> Fn(App<'static, 'a>) -> App<'static, 'a> + 'static,
{
    fn from(func: F) -> Self {
        let make_options = Box::new(func);
        Self { make_options }
    }
}

inventory::collect!(ExtraOptionsFunc);
