use std::collections::HashMap;
use std::time::Instant;

use anyhow::{Result, anyhow};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use expressions::context::{BinaryOpcode, Context, Node, Op};

/// Builds a heavily shared expression, then prints and evaluates it
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of levels in the expression
    ///
    /// Each level uses the previous level twice, so the equivalent tree has
    /// more than `2^depth` nodes.
    #[clap(short, long, default_value_t = 16)]
    depth: usize,

    /// Binds a symbol to a value, e.g. `--var x=1.5`
    #[clap(short, long = "var", value_parser = parse_var)]
    vars: Vec<(String, f64)>,

    /// Print the rendered expression
    #[clap(short, long)]
    print: bool,
}

fn parse_var(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{s}`"))?;
    let value = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for `{name}`: {e}"))?;
    Ok((name.trim().to_owned(), value))
}

/// Builds `x_{k+1} = (x_k + x_k * y) / (1 + y)`, starting from `x`
fn build(ctx: &mut Context, depth: usize) -> Result<Node> {
    let x = ctx.symbol("x");
    let y = ctx.symbol("y");
    let mut n = x;
    for _ in 0..depth {
        let scaled = ctx.mul(n, y)?;
        let num = ctx.add(n, scaled)?;
        let den = ctx.add(1, y)?;
        n = ctx.div(num, den)?;
    }
    Ok(n)
}

fn eval(ctx: &Context, root: Node, vars: &HashMap<String, f64>) -> Result<f64> {
    ctx.postorder(root, |_, op, args: &[&f64]| match op {
        Op::Number(v) => Ok(v.to_f64()),
        Op::Symbol(s) => vars
            .get(&**s)
            .copied()
            .ok_or_else(|| anyhow!("symbol `{s}` is not bound")),
        Op::Binary(op, ..) => {
            let (a, b) = (*args[0], *args[1]);
            Ok(match op {
                BinaryOpcode::Add => a + b,
                BinaryOpcode::Sub => a - b,
                BinaryOpcode::Mul => a * b,
                BinaryOpcode::Div => a / b,
                BinaryOpcode::Pow => a.powf(b),
            })
        }
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .init();
    let args = Args::parse();

    let now = Instant::now();
    let mut ctx = Context::new();
    let root = build(&mut ctx, args.depth)?;
    info!("Built {} nodes in {:?}", ctx.len(), now.elapsed());

    if args.print {
        if args.depth > 10 {
            warn!("rendered text grows exponentially with --depth");
        }
        let now = Instant::now();
        let text = ctx.render(root)?;
        info!("Rendered {} bytes in {:?}", text.len(), now.elapsed());
        println!("{text}");
    }

    let vars: HashMap<String, f64> = args.vars.into_iter().collect();
    let now = Instant::now();
    let v = eval(&ctx, root, &vars)?;
    info!("Evaluated in {:?}", now.elapsed());
    println!("{v}");

    Ok(())
}
