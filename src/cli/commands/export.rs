use crate::cli::commands::{close_store, open_store, period_bounds};
use crate::cli::parser::{ExportArgs, ExportView};
use crate::config::Config;
use crate::core::cash::CashLogic;
use crate::core::clients::ClientsLogic;
use crate::core::employees::EmployeesLogic;
use crate::core::expenses::{ExpenseGrouping, ExpensesLogic};
use crate::core::history::{HistoryFilter, filter_entries};
use crate::core::invoice::InvoiceLogic;
use crate::core::jobs::{JobListOptions, JobsLogic};
use crate::core::payroll::PayrollSheet;
use crate::core::reports::{services_by_worker, transfers};
use crate::errors::{AppError, AppResult};
use crate::export::{ExportLogic, ExportTable, tables};
use crate::store::{Collection, CollectionStore};
use crate::utils::date;

fn build_table(store: &CollectionStore, args: &ExportArgs) -> AppResult<ExportTable> {
    let bounds = period_bounds(&args.period)?;
    let period = date::describe_period(bounds);

    let table = match args.view {
        ExportView::Jobs => {
            let opts = JobListOptions {
                page: 1,
                page_size: 0,
                ..Default::default()
            };
            let sheet = args.sheet.collection();
            let jobs = JobsLogic::list(store, sheet, &opts)?.items;
            tables::jobs_table(&format!("Servicios {}", sheet), &jobs, &EmployeesLogic::names(store)?)
        }
        ExportView::Clients => tables::clients_table(&ClientsLogic::list(store, None)?),
        ExportView::Invoices => tables::invoices_table(&InvoiceLogic::list(store, args.status)?),
        ExportView::Expenses => {
            let expenses = ExpensesLogic::list(store, bounds)?;
            let groups = ExpensesLogic::group(&expenses, ExpenseGrouping::Date);
            let mut t = tables::expenses_table(&groups, ExpensesLogic::grand_total(&expenses));
            t.title = format!("{} ({})", t.title, period);
            t
        }
        ExportView::Payroll => {
            let run = args
                .run
                .as_deref()
                .ok_or_else(|| AppError::Required("--run".into()))?;
            let sheet = PayrollSheet::load(store, run)?;
            tables::payroll_table(&sheet, &EmployeesLogic::names(store)?)
        }
        ExportView::Cash => {
            let employee = args
                .employee
                .as_deref()
                .ok_or_else(|| AppError::Required("--employee".into()))?;
            let emp = EmployeesLogic::resolve(store, employee)?;
            let lines = CashLogic::ledger(store, &emp.id)?;
            tables::cash_table(emp.text("name").unwrap_or(&emp.id), &lines)
        }
        ExportView::History => {
            let entries: Vec<_> = filter_entries(
                &store.snapshot(Collection::History)?,
                &HistoryFilter::default(),
            )
            .into_iter()
            .filter(|e| date::matches_range(Some(&e.fecha), bounds))
            .collect();
            tables::history_table(&entries)
        }
        ExportView::Transfers => {
            let mut t = tables::transfers_table(
                &transfers(store, bounds, None)?,
                &EmployeesLogic::names(store)?,
            );
            t.title = format!("{} ({})", t.title, period);
            t
        }
        ExportView::Services => {
            let mut t = tables::services_table(&services_by_worker(store, bounds)?);
            t.title = format!("{} ({})", t.title, period);
            t
        }
    };

    Ok(table)
}

pub fn handle(args: &ExportArgs, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;

    let table = build_table(&store, args)?;
    ExportLogic::export(&table, args.format, &args.file, args.force)?;

    close_store(store);
    Ok(())
}
