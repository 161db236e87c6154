use crate::core::expenses::ExpenseGrouping;
use crate::core::invoice::PaidFilter;
use crate::export::ExportFormat;
use crate::models::audit::AuditAction;
use crate::models::client::ClientField;
use crate::models::expense::ExpenseField;
use crate::models::invoice::InvoiceField;
use crate::models::job::JobField;
use crate::models::payroll::PayrollField;
use crate::store::Collection;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line interface definition for rServiceOps
/// Back office for a septic and water-truck service company
#[derive(Parser)]
#[command(
    name = "rserviceops",
    version = env!("CARGO_PKG_VERSION"),
    about = "Service jobs, clients, invoices, expenses, payroll and cash for a water-truck company",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Acting user recorded in the change history
    #[arg(global = true, long = "user")]
    pub user: Option<String>,

    /// Do not record changes in the history for this command
    #[arg(global = true, long = "no-history")]
    pub no_history: bool,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Day sheet a job lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Sheet {
    #[default]
    Today,
    Tomorrow,
    DayAfter,
}

impl Sheet {
    pub fn collection(&self) -> Collection {
        match self {
            Sheet::Today => Collection::Today,
            Sheet::Tomorrow => Collection::Tomorrow,
            Sheet::DayAfter => Collection::DayAfter,
        }
    }
}

/// What the `export` command writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportView {
    Jobs,
    Clients,
    Invoices,
    Expenses,
    Payroll,
    Cash,
    History,
    Transfers,
    Services,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,

        #[arg(
            long = "set-counter",
            value_name = "N",
            help = "Set the invoice counter (the next invoice gets N+1)"
        )]
        set_counter: Option<i64>,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "limit", help = "Only the last N rows")]
        limit: Option<usize>,
    },

    /// Backup the database to a file
    Backup {
        #[arg(long = "file", help = "Destination file (absolute path)")]
        file: String,

        #[arg(long = "compress", help = "Compress the backup as .zip")]
        compress: bool,

        #[arg(long = "force", help = "Overwrite without asking")]
        force: bool,
    },

    /// Service jobs on the day sheets
    #[command(subcommand)]
    Job(JobCmd),

    /// Client directory
    #[command(subcommand)]
    Client(ClientCmd),

    /// Employees (workers)
    #[command(subcommand)]
    User(UserCmd),

    /// Invoices
    #[command(subcommand)]
    Invoice(InvoiceCmd),

    /// Expenses
    #[command(subcommand)]
    Expense(ExpenseCmd),

    /// Payroll extras
    #[command(subcommand)]
    Extra(AdjustmentCmd),

    /// Payroll deductions
    #[command(subcommand)]
    Deduction(AdjustmentCmd),

    /// Cash collected and handed in by workers
    #[command(subcommand)]
    Cash(CashCmd),

    /// Payroll runs
    #[command(subcommand)]
    Payroll(PayrollCmd),

    /// Close the day
    #[command(subcommand)]
    Day(DayCmd),

    /// Reports over live and archived jobs
    #[command(subcommand)]
    Report(ReportCmd),

    /// Change history
    #[command(subcommand)]
    History(HistoryCmd),

    /// Export a view to CSV, JSON, XLSX or PDF
    Export(ExportArgs),
}

#[derive(Subcommand)]
pub enum JobCmd {
    /// Add a job. Without --set the job is empty.
    Add {
        #[arg(long, value_enum, default_value_t = Sheet::Today)]
        sheet: Sheet,

        /// FIELD=VALUE, repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },

    /// Set one field of a job
    Set {
        id: String,
        #[arg(value_enum)]
        field: JobField,
        /// New value (empty clears it)
        #[arg(allow_hyphen_values = true)]
        value: String,
        #[arg(long, value_enum, default_value_t = Sheet::Today)]
        sheet: Sheet,
    },

    /// Assign a job to a worker, or unassign it
    Assign {
        id: String,
        /// Worker id or name; omit to unassign
        worker: Option<String>,
        #[arg(long, value_enum, default_value_t = Sheet::Today)]
        sheet: Sheet,
    },

    /// Delete a job
    Del {
        id: String,
        #[arg(long, value_enum, default_value_t = Sheet::Today)]
        sheet: Sheet,
    },

    /// List the jobs of a sheet
    List {
        #[arg(long, value_enum, default_value_t = Sheet::Today)]
        sheet: Sheet,

        #[arg(long, help = "Only jobs of this worker (id or name)")]
        worker: Option<String>,

        #[arg(long = "unassigned-first", help = "Show unassigned jobs first")]
        unassigned_first: bool,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long = "page-size", help = "Rows per page (0 = all)")]
        page_size: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum ClientCmd {
    Add {
        direccion: String,
        #[arg(long = "nombre")]
        anombrede: Option<String>,
        #[arg(long)]
        cubicos: Option<f64>,
        #[arg(long)]
        valor: Option<f64>,
        #[arg(long)]
        email: Option<String>,
    },
    Set {
        id: String,
        #[arg(value_enum)]
        field: ClientField,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    List {
        #[arg(long, help = "Substring of address or name")]
        search: Option<String>,
    },
    Del {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum UserCmd {
    Add {
        name: String,
        #[arg(long)]
        role: Option<String>,
    },
    List {
        #[arg(long, help = "Include inactive employees")]
        all: bool,
    },
    Rename {
        key: String,
        name: String,
    },
    Role {
        key: String,
        role: String,
    },
    Activate {
        key: String,
    },
    Deactivate {
        key: String,
    },
    Del {
        key: String,
    },
}

#[derive(Subcommand)]
pub enum InvoiceCmd {
    /// Create an invoice with the next number
    Create {
        #[arg(long = "nombre")]
        anombrede: Option<String>,
        #[arg(long)]
        direccion: Option<String>,
        #[arg(long, help = "Bill-to text overriding name and address")]
        personalizado: Option<String>,
        #[arg(long, help = "Price list item")]
        item: Option<String>,
        #[arg(long, default_value_t = 1.0)]
        qty: f64,
        #[arg(long, help = "Rate (defaults to the price list rate of the item)")]
        rate: Option<f64>,
    },

    /// Create an invoice from a scheduled job
    FromJob {
        job: String,
        #[arg(long, value_enum, default_value_t = Sheet::Today)]
        sheet: Sheet,
        #[arg(long)]
        item: Option<String>,
    },

    /// Set one field of an invoice (id or number)
    Set {
        key: String,
        #[arg(value_enum)]
        field: InvoiceField,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    List {
        #[arg(long, value_enum, default_value_t = PaidFilter::All)]
        status: PaidFilter,
    },

    Del {
        key: String,
    },

    /// Show the price list
    Prices,

    /// Show or update the letterhead printed on invoices
    Letterhead {
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        direccion: Option<String>,
        #[arg(long)]
        telefono: Option<String>,
        #[arg(long)]
        correo: Option<String>,
        #[arg(long)]
        nota: Option<String>,
    },

    /// Render invoices to a PDF, one per page
    Print {
        /// Invoice ids or numbers
        #[arg(required = true)]
        keys: Vec<String>,
        #[arg(long, help = "Output PDF (absolute path)")]
        file: String,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ExpenseCmd {
    Add {
        #[arg(long)]
        monto: f64,
        #[arg(long)]
        fecha: Option<String>,
        #[arg(long)]
        categoria: Option<String>,
        #[arg(long)]
        descripcion: Option<String>,
        #[arg(long)]
        proveedor: Option<String>,
        #[arg(long = "metodo")]
        metodo_pago: Option<String>,
        #[arg(long)]
        banco: Option<String>,
        #[arg(long = "factura")]
        num_factura: Option<String>,
        #[arg(long)]
        responsable: Option<String>,
    },
    Set {
        id: String,
        #[arg(value_enum)]
        field: ExpenseField,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    List {
        #[arg(long, help = "YYYY, YYYY-MM, a date or FROM:TO")]
        period: Option<String>,
        #[arg(long = "by", value_enum, default_value_t = ExpenseGrouping::Date)]
        by: ExpenseGrouping,
    },
    Del {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum AdjustmentCmd {
    Add {
        /// Employee id or name
        employee: String,
        #[arg(allow_hyphen_values = true)]
        valor: f64,
        #[arg(long)]
        fecha: Option<String>,
        #[arg(long)]
        descripcion: Option<String>,
    },
    List {
        #[arg(long)]
        employee: Option<String>,
        #[arg(long)]
        period: Option<String>,
    },
    Del {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CashCmd {
    /// Record cash collected (positive) or handed in (negative)
    Add {
        employee: String,
        #[arg(allow_hyphen_values = true)]
        efectivo: f64,
        #[arg(long)]
        fecha: Option<String>,
        #[arg(long = "metodo")]
        metodo: Option<String>,
        #[arg(long)]
        direccion: Option<String>,
        #[arg(long)]
        notas: Option<String>,
    },
    /// Entries of one worker with the running balance
    Show {
        employee: String,
    },
    Del {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum PayrollCmd {
    /// Create a run for a period
    Create {
        desde: String,
        hasta: String,
        #[arg(long = "all-employees", help = "Add a row for every active employee")]
        all_employees: bool,
        #[arg(long, default_value_t = 0.0)]
        dias: f64,
        #[arg(long, default_value_t = 0.0)]
        valor: f64,
    },
    /// Add a row to a run
    AddRow {
        run: String,
        #[arg(long)]
        employee: Option<String>,
        #[arg(long, default_value_t = 0.0)]
        dias: f64,
        #[arg(long, default_value_t = 0.0)]
        valor: f64,
    },
    RemoveRow {
        run: String,
        row: String,
    },
    /// Set a numeric field of a row (extra, deducciones and efectivo are
    /// overrides: refresh and assign recompute them)
    Set {
        run: String,
        row: String,
        #[arg(value_enum)]
        field: PayrollField,
        #[arg(allow_hyphen_values = true)]
        value: f64,
    },
    /// Assign a row to an employee and recompute it
    Assign {
        run: String,
        row: String,
        employee: String,
        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
    /// Recompute rows from current extras, deductions and cash
    Refresh {
        run: String,
        #[arg(long = "keep", value_name = "ROW", help = "Rows left as they are")]
        keep: Vec<String>,
    },
    Show {
        run: String,
    },
    List,
    Del {
        run: String,
    },
}

#[derive(Subcommand)]
pub enum DayCmd {
    /// Archive today's sheet and move tomorrow's jobs forward
    Rollover {
        #[arg(long, help = "Date to archive under (default: today)")]
        date: Option<String>,
        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
    /// List archived days
    Archive {
        #[arg(long)]
        period: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ReportCmd {
    /// Transfer payments grouped by bank
    Transfers {
        #[arg(long)]
        period: Option<String>,
        #[arg(long)]
        bank: Option<String>,
    },
    /// Services done by each worker
    Services {
        #[arg(long)]
        period: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum HistoryCmd {
    List {
        #[arg(long, help = "Collection name")]
        lugar: Option<String>,
        #[arg(long = "id", help = "Record id")]
        record_id: Option<String>,
        #[arg(long, value_enum)]
        action: Option<AuditAction>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
}

#[derive(Args)]
pub struct ExportArgs {
    #[arg(value_enum)]
    pub view: ExportView,

    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    #[arg(long, help = "Output file (absolute path)")]
    pub file: String,

    #[arg(long)]
    pub force: bool,

    #[arg(long, help = "Date range for expenses, reports and history")]
    pub period: Option<String>,

    #[arg(long, value_enum, default_value_t = Sheet::Today)]
    pub sheet: Sheet,

    #[arg(long, help = "Payroll run id")]
    pub run: Option<String>,

    #[arg(long, help = "Employee for the cash report")]
    pub employee: Option<String>,

    #[arg(long, value_enum, default_value_t = PaidFilter::All)]
    pub status: PaidFilter,
}
