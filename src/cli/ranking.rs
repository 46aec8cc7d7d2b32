use crate::{
    cli::setup, error, info,
    types::{Category, Owner},
    warning,
};

/// Shows a stored ranking.
///
/// `top` limits the output to the first N positions; `from` shows everything
/// from position N on. Without either the whole ranking is printed.
///
/// # Example Usage
///
/// ```bash
/// tunematch ranking --brand acme --category genres --top 3
/// tunematch ranking --user alice --category artists --from 4
/// ```
pub fn ranking(owner: Owner, category: Category, top: Option<usize>, from: Option<usize>) {
    let store = setup::open_store();
    let table = match store.load_ranking(&owner, category) {
        Ok(table) => table,
        Err(e) => error!("Cannot load {} ranking of {}. Err: {}", category, owner, e),
    };

    if table.is_empty() {
        warning!("No {} ranking stored for {}", category, owner);
        return;
    }

    let (start, end) = match (top, from) {
        (Some(n), _) => (1, n),
        (None, Some(n)) => (n.max(1), table.len()),
        (None, None) => (1, table.len()),
    };

    info!("{} ranking of {} ({} entries)", category, owner, table.len());
    setup::print_ranking(table.slice(start, end), start);
}
