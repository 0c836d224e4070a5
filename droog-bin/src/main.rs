use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use serde::Serialize;
use structopt::StructOpt;

use droog::alphabet;
use droog::candidate::{Candidates, Ranker, Variant};
use droog::model::{ConfusionModel, DirectoryCorpus};
use droog::oracle::{
    self, Budgeted, FilterConfig, Filtered, FrequencyOracle, OracleError, SearchApiOracle,
    TableOracle,
};
use droog::report::{self, ListSpec};
use droog::store::{ListKind, ResultStore};
use droog::DroogConfig;

/// Search API lookups allowed per run unless `--budget` is given; the free
/// tier allows 100 a day.
const DEFAULT_SEARCH_BUDGET: usize = 100;

trait OutputWriter {
    fn write_candidates(&mut self, word: &str, distance: u8, variants: &[Variant]);
    fn finish(&mut self) -> anyhow::Result<()>;
}

struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write_candidates(&mut self, word: &str, distance: u8, variants: &[Variant]) {
        println!("Input: {}\t\t[distance {}]", word, distance);
        for v in variants {
            if distance > 1 {
                println!("{}\t\t{:e}\t{:e}\t{}", v.value, v.joint(), v.probability, v.provenance);
            } else {
                println!("{}\t\t{:e}\t{}", v.value, v.probability, v.provenance);
            }
        }
        println!();
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct CandidateList {
    word: String,
    distance: u8,
    candidates: Vec<Variant>,
}

#[derive(Serialize)]
struct JsonWriter {
    results: Vec<CandidateList>,
}

impl JsonWriter {
    pub fn new() -> JsonWriter {
        JsonWriter { results: vec![] }
    }
}

impl OutputWriter for JsonWriter {
    fn write_candidates(&mut self, word: &str, distance: u8, variants: &[Variant]) {
        self.results.push(CandidateList {
            word: word.to_owned(),
            distance,
            candidates: variants.to_vec(),
        });
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "droog",
    about = "Generate, filter and analyse likely misspellings of a word."
)]
struct Args {
    #[structopt(short, long, parse(from_os_str), help = "JSON configuration file")]
    config: Option<PathBuf>,

    #[structopt(
        long,
        parse(from_os_str),
        help = "directory holding misspellings.txt, char_counts.txt and bigram_counts.txt"
    )]
    data: Option<PathBuf>,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    #[structopt(about = "Rank the distance 1 and 2 variants of a word and save them")]
    Generate {
        word: String,

        #[structopt(short = "y", long = "yes", help = "overwrite existing lists without asking")]
        yes: bool,
    },

    #[structopt(about = "Look up saved variants and keep the ones that occur")]
    Filter(FilterArgs),

    #[structopt(about = "Print how the pages of a filtered word are spread over its misspellings")]
    Analyze { word: String },

    #[structopt(about = "Print the misspellings of a filtered word: all, n or n%")]
    List { word: String, selection: ListSpec },

    #[structopt(about = "Print ranked variants without saving them")]
    Candidates {
        word: String,

        #[structopt(long, help = "output in JSON format")]
        json: bool,

        #[structopt(long, possible_values = &["1", "2"], help = "only this edit distance")]
        distance: Option<u8>,

        #[structopt(long, help = "maximum number of variants per distance")]
        top: Option<usize>,
    },
}

#[derive(Debug, StructOpt)]
struct FilterArgs {
    word: String,

    #[structopt(short = "y", long = "yes", help = "overwrite an existing filtered list without asking")]
    yes: bool,

    #[structopt(long, help = "maximum number of variants looked up")]
    limit: Option<usize>,

    #[structopt(
        long,
        parse(from_os_str),
        help = "answer lookups from a term,count file instead of the search API"
    )]
    table: Option<PathBuf>,

    #[structopt(long, help = "maximum number of lookups in this run")]
    budget: Option<usize>,

    #[structopt(long, help = "save the list even when the budget runs out")]
    partial: bool,
}

fn load_config(args: &Args) -> anyhow::Result<DroogConfig> {
    let mut config = match &args.config {
        Some(path) => DroogConfig::from_path(path)?,
        None => DroogConfig::default(),
    };

    if let Some(data) = &args.data {
        config.data_dir = data.clone();
    }

    log::debug!("data in {}, results in {}", config.data_dir.display(), config.results_dir.display());
    Ok(config)
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    eprint!("{} [y/N] ", question);
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// True when nothing needs approval, approval was `given` up front, or `ask`
/// agrees to `question`.
fn consent<F>(needed: bool, given: bool, question: &str, ask: F) -> anyhow::Result<bool>
where
    F: FnOnce(&str) -> anyhow::Result<bool>,
{
    if !needed || given {
        return Ok(true);
    }
    ask(question)
}

/// Fails unless every list of `kinds` has been saved for `word`.
fn require(store: &ResultStore, word: &str, kinds: &[ListKind], command: &str) -> anyhow::Result<()> {
    alphabet::validate_word(word)?;

    let missing = store.missing(word, kinds);
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|kind| kind.name()).collect();
        anyhow::bail!(
            "No {} list for {:?} in {}; run `droog {} {}` first",
            names.join(", "),
            word,
            store.root().display(),
            command,
            word
        );
    }

    Ok(())
}

fn generate(config: &DroogConfig, word: &str, yes: bool) -> anyhow::Result<()> {
    alphabet::validate_word(word)?;
    let store = ResultStore::new(&config.results_dir);

    let question = format!(
        "Lists for {:?} already exist in {}. Overwrite?",
        word,
        store.word_dir(word).display()
    );
    if !consent(store.has_word(word), yes, &question, confirm)? {
        eprintln!("Nothing written.");
        return Ok(());
    }

    let corpus = DirectoryCorpus::open(&config.data_dir)?;
    let candidates = droog::candidate::generate(&corpus, word, &config.scorer)?;

    store.save_candidates(word, ListKind::D1, &candidates.d1)?;
    store.save_candidates(word, ListKind::D2, &candidates.d2)?;
    let likely = candidates.likely(&config.likely);
    store.save_terms(word, ListKind::Likely, likely.iter().copied())?;

    println!(
        "{}: {} distance 1, {} distance 2, {} likely variants written to {}",
        word,
        candidates.d1.len(),
        candidates.d2.len(),
        likely.len(),
        store.word_dir(word).display()
    );
    Ok(())
}

fn run_filter<O: FrequencyOracle>(
    word: &str,
    d1: &[Variant],
    d2: &[Variant],
    mut oracle: O,
    budget: Option<usize>,
    config: &FilterConfig,
) -> Result<Filtered, OracleError> {
    match budget {
        Some(budget) => {
            let mut oracle = Budgeted::new(oracle, budget);
            let filtered = oracle::filter_variants(word, d1, d2, &mut oracle, config)?;
            log::info!("{} lookups left in budget", oracle.remaining());
            Ok(filtered)
        }
        None => oracle::filter_variants(word, d1, d2, &mut oracle, config),
    }
}

fn filter(
    config: &DroogConfig,
    args: FilterArgs,
    ask: &mut dyn FnMut(&str) -> anyhow::Result<bool>,
) -> anyhow::Result<()> {
    let word = args.word.as_str();
    let store = ResultStore::new(&config.results_dir);
    require(&store, word, &[ListKind::D1, ListKind::D2], "generate")?;

    let question = format!(
        "A filtered list for {:?} already exists in {}. Overwrite?",
        word,
        store.word_dir(word).display()
    );
    if !consent(store.exists(word, ListKind::Filtered), args.yes, &question, &mut *ask)? {
        eprintln!("Nothing written.");
        return Ok(());
    }

    let (d1, d2) = store.read_distances(word)?;

    let mut filter_config = config.filter.clone();
    if args.limit.is_some() {
        filter_config.limit = args.limit;
    }

    let filtered = match &args.table {
        Some(path) => {
            let table = TableOracle::open(path)?;
            log::info!("{} terms in {}", table.len(), path.display());
            run_filter(word, &d1, &d2, table, args.budget, &filter_config)?
        }
        None => {
            let search = config.search.clone().ok_or_else(|| {
                anyhow::anyhow!("No search API credentials configured; set \"search\" in the configuration or pass --table")
            })?;
            let budget = args.budget.unwrap_or(DEFAULT_SEARCH_BUDGET);
            run_filter(word, &d1, &d2, SearchApiOracle::new(search), Some(budget), &filter_config)?
        }
    };

    if !filtered.is_complete() {
        eprintln!(
            "Lookup budget exhausted: {} of {} terms looked up for {:?}.",
            filtered.looked_up, filtered.planned, word
        );
        if !consent(true, args.partial, "Save the partial list?", &mut *ask)? {
            anyhow::bail!(
                "Partial list for {:?} not saved; raise --budget or pass --partial to keep it",
                word
            );
        }
    }

    let path = store.save_filtered(word, &filtered.counts)?;
    println!(
        "{}: {} terms with hits written to {}",
        word,
        filtered.counts.len(),
        path.display()
    );
    Ok(())
}

fn analyze(config: &DroogConfig, word: &str) -> anyhow::Result<()> {
    let store = ResultStore::new(&config.results_dir);
    require(&store, word, &[ListKind::Filtered], "filter")?;

    let filtered = store.read_filtered(word)?;
    print!("{}", report::analyze(word, &filtered));
    Ok(())
}

fn list(config: &DroogConfig, word: &str, selection: ListSpec) -> anyhow::Result<()> {
    let store = ResultStore::new(&config.results_dir);
    require(&store, word, &[ListKind::Filtered], "filter")?;

    let filtered = store.read_filtered(word)?;
    for misspelling in report::select_misspellings(word, &filtered, selection) {
        println!("{}", misspelling);
    }
    Ok(())
}

fn candidates(
    config: &DroogConfig,
    word: &str,
    use_json: bool,
    distance: Option<u8>,
    top: Option<usize>,
) -> anyhow::Result<()> {
    alphabet::validate_word(word)?;
    let corpus = DirectoryCorpus::open(&config.data_dir)?;
    let model = ConfusionModel::load(&corpus)?;
    let ranker = Ranker::with_model(&model, config.scorer.clone());

    let lists = match distance {
        Some(1) => vec![(1, ranker.d1_candidates(word)?)],
        Some(_) => vec![(2, ranker.d2_candidates(word)?)],
        None => {
            let Candidates { d1, d2, .. } = ranker.candidates(word)?;
            vec![(1, d1), (2, d2)]
        }
    };

    let mut writer: Box<dyn OutputWriter> = if use_json {
        Box::new(JsonWriter::new())
    } else {
        Box::new(StdoutWriter)
    };

    for (distance, variants) in lists {
        let n = top.map_or(variants.len(), |top| top.min(variants.len()));
        writer.write_candidates(word, distance, &variants[..n]);
    }

    writer.finish()
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::from_args();
    let config = load_config(&args)?;

    match args.command {
        Command::Generate { word, yes } => generate(&config, &word, yes),
        Command::Filter(args) => filter(&config, args, &mut confirm),
        Command::Analyze { word } => analyze(&config, &word),
        Command::List { word, selection } => list(&config, &word, selection),
        Command::Candidates {
            word,
            json,
            distance,
            top,
        } => candidates(&config, &word, json, distance, top),
    }
}
