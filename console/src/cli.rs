use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use hrdesk_console::{
    api::ApiError,
    export::{self, ExportKind},
    sections::{leaves::LeaveForm, notifications::TerminalAlertSink},
    Console,
};
use hrdesk_core::{
    dashboard::LeaveFilter, models::attendance::parse_clock, reminders::badge_text, AttendanceForm,
    AttendanceStatus, DepartmentForm, DepartmentId, EmployeeForm, EmployeeId, EmployeeStatus,
    LeaveId, LeaveType, NotificationId,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "hrdesk", version, about = "HR administration console")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Forget the saved session
    Logout,
    /// Leave requests and approvals
    Leaves {
        #[command(subcommand)]
        action: LeavesCommand,
    },
    /// Employee directory
    Employees {
        #[command(subcommand)]
        action: EmployeesCommand,
    },
    /// Contracting companies
    Departments {
        #[command(subcommand)]
        action: DepartmentsCommand,
    },
    /// Attendance sheet
    Attendance {
        #[command(subcommand)]
        action: AttendanceCommand,
    },
    /// Headcount and today's presence
    Dashboard,
    /// Leave reminders
    Notifications {
        /// Keep polling and alert on new reminders until interrupted
        #[arg(long)]
        watch: bool,
        #[command(subcommand)]
        action: Option<NotificationsCommand>,
    },
    /// Write cached records to a CSV file
    Export {
        #[arg(value_enum)]
        kind: ExportKind,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum LeavesCommand {
    List {
        /// all, pending, manager_approved, approved or rejected
        #[arg(long, default_value = "all")]
        status: LeaveFilter,
    },
    /// Requests still awaiting a decision
    Pending {
        /// Ask the backend instead of filtering the cache
        #[arg(long)]
        remote: bool,
    },
    Submit {
        #[arg(long)]
        employee: EmployeeId,
        #[arg(long = "type", default_value = "paid")]
        leave_type: LeaveType,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value = "")]
        reason: String,
    },
    Approve { id: LeaveId },
    Reject { id: LeaveId },
    Delete { id: LeaveId },
}

#[derive(Debug, Subcommand)]
pub enum EmployeesCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        department: Option<DepartmentId>,
    },
    Create(EmployeeArgs),
    Update {
        id: EmployeeId,
        #[command(flatten)]
        fields: EmployeeArgs,
    },
    Delete { id: EmployeeId },
}

#[derive(Debug, Args)]
pub struct EmployeeArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    department: DepartmentId,
    #[arg(long)]
    position: String,
    #[arg(long)]
    hire_date: NaiveDate,
    #[arg(long)]
    birth_date: NaiveDate,
    #[arg(long, default_value_t = 0.0)]
    salary: f64,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    direction: String,
    #[arg(long, default_value = "")]
    matricule: String,
    #[arg(long, default_value = "")]
    cnps: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "active")]
    status: EmployeeStatus,
}

impl From<EmployeeArgs> for EmployeeForm {
    fn from(args: EmployeeArgs) -> Self {
        EmployeeForm {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            department: args.department,
            direction: args.direction,
            position: args.position,
            hire_date: args.hire_date,
            salary: args.salary,
            matricule: args.matricule,
            cnps: args.cnps,
            address: args.address,
            status: args.status,
            birth_date: args.birth_date,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum DepartmentsCommand {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        manager: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Delete { id: DepartmentId },
}

#[derive(Debug, Subcommand)]
pub enum AttendanceCommand {
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        employee: Option<EmployeeId>,
    },
    Mark {
        #[arg(long)]
        employee: EmployeeId,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        check_in: Option<String>,
        #[arg(long)]
        check_out: Option<String>,
        #[arg(long, default_value = "present")]
        status: AttendanceStatus,
    },
}

#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// Mark one reminder, or all of them, as read
    Read {
        id: Option<NotificationId>,
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },
}

pub async fn run(mut console: Console, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { username, password } => {
            let user = console.login(&username, &password).await?;
            println!("Signed in as {} ({})", user.display_name(), user.role.label());
            if !user.role.uses_admin_console() {
                println!("Employee accounts can submit leave requests only.");
            }
            Ok(())
        }
        Command::Logout => {
            console.logout().await?;
            println!("Signed out");
            Ok(())
        }
        Command::Leaves { action } => leaves(&console, action).await,
        Command::Employees { action } => employees(&console, action).await,
        Command::Departments { action } => departments(&console, action).await,
        Command::Attendance { action } => attendance(&console, action).await,
        Command::Dashboard => {
            console.admin_viewer().await?;
            console.reload().await?;
            let stats = console.dashboard().await;
            println!("Employees:        {}", stats.total_employees);
            println!("Companies:        {}", stats.total_departments);
            println!("Present today:    {}", stats.present_today);
            println!("On leave today:   {}", stats.on_leave_today);
            println!("\nRecently hired:");
            for e in &stats.recent_employees {
                let hired = e.hire_date.map(|d| d.to_string()).unwrap_or_default();
                println!("  {:<10} {:<30} {}", hired, e.full_name(), e.department_name);
            }
            println!("\nRecent leave requests:");
            for l in &stats.recent_leaves {
                println!(
                    "  #{:<5} {:<25} {:<15} {}",
                    l.id,
                    l.employee_name,
                    l.leave_type.label(),
                    l.status.label()
                );
            }
            Ok(())
        }
        Command::Notifications { watch, action } => notifications(&mut console, watch, action).await,
        Command::Export { kind, out } => {
            console.admin_viewer().await?;
            console.reload().await?;
            let path = out.unwrap_or_else(|| PathBuf::from(kind.default_file_name()));
            let file = std::fs::File::create(&path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            let rows = export::export(kind, &console.store().snapshot().await, file)?;
            println!("Wrote {} rows to {}", rows, path.display());
            Ok(())
        }
    }
}

async fn leaves(console: &Console, action: LeavesCommand) -> anyhow::Result<()> {
    let view = console.leaves();
    let viewer = console.viewer().await?;
    match action {
        LeavesCommand::Submit {
            employee,
            leave_type,
            start,
            end,
            reason,
        } => {
            if !viewer.role.can_submit_leave() {
                bail!("{} accounts cannot submit leave requests", viewer.role.label());
            }
            console.reload().await?;
            view.submit(LeaveForm {
                employee,
                leave_type,
                start_date: start,
                end_date: end,
                reason,
            })
            .await?;
            println!("Leave request submitted");
            return Ok(());
        }
        LeavesCommand::List { status } if !viewer.role.uses_admin_console() => {
            console.reload().await?;
            let own = view.own(status).await?;
            let summary = &own.summary;
            println!("{} ({})", own.employee.full_name(), own.employee.matricule);
            println!(
                "Paid leave: {} days left, {} pending, {} available",
                summary.balance, summary.pending_days, summary.available
            );
            println!(
                "Requests: {} total, {} awaiting decision, {} approved, {} rejected\n",
                summary.total, summary.awaiting_decision, summary.approved, summary.rejected
            );
            print_leave_rows(&own.rows);
            return Ok(());
        }
        _ => {
            console.admin_viewer().await?;
            console.reload().await?;
        }
    }

    match action {
        LeavesCommand::List { status } => print_leave_rows(&view.rows(status).await?),
        LeavesCommand::Pending { remote } => {
            let rows = if remote {
                view.backend_queue().await?
            } else {
                view.queue().await?
            };
            print_leave_rows(&rows)
        }
        LeavesCommand::Approve { id } => {
            let next = view.approve(id).await?;
            println!("Leave #{} is now {}", id, next.label());
        }
        LeavesCommand::Reject { id } => {
            view.reject(id).await?;
            println!("Leave #{} rejected", id);
        }
        LeavesCommand::Delete { id } => {
            view.delete(id).await?;
            println!("Leave #{} deleted", id);
        }
        LeavesCommand::Submit { .. } => {}
    }
    Ok(())
}

fn print_leave_rows(rows: &[hrdesk_console::sections::leaves::LeaveRow]) {
    if rows.is_empty() {
        println!("No leave requests");
        return;
    }
    println!(
        "{:<6} {:<25} {:<15} {:<25} {:>4}  {:<22} {}",
        "ID", "EMPLOYEE", "TYPE", "PERIOD", "DAYS", "STATUS", "ACTIONS"
    );
    for row in rows {
        println!(
            "{:<6} {:<25} {:<15} {:<25} {:>4}  {:<22} {}",
            row.leave.id,
            row.leave.employee_name,
            row.leave.leave_type.label(),
            row.period_label(),
            row.leave.days,
            row.leave.status.label(),
            row.actions_label()
        );
    }
}

async fn employees(console: &Console, action: EmployeesCommand) -> anyhow::Result<()> {
    console.admin_viewer().await?;
    console.reload().await?;
    let section = console.employees();
    match action {
        EmployeesCommand::List { search, department } => {
            let found = section.search(&search, department).await;
            println!(
                "{:<6} {:<28} {:<30} {:<20} {:<20} {:<10} {}",
                "ID", "NAME", "EMAIL", "COMPANY", "POSITION", "STATUS", "RETIRES"
            );
            for e in found {
                println!(
                    "{:<6} {:<28} {:<30} {:<20} {:<20} {:<10} {}",
                    e.id,
                    e.full_name(),
                    e.email,
                    e.department_name,
                    e.position,
                    e.status.label(),
                    e.retirement_year().map(|y| y.to_string()).unwrap_or_default()
                );
            }
        }
        EmployeesCommand::Create(args) => {
            section.create(&EmployeeForm::from(args)).await?;
            println!("Employee created");
        }
        EmployeesCommand::Update { id, fields } => {
            section.update(id, &EmployeeForm::from(fields)).await?;
            println!("Employee #{} updated", id);
        }
        EmployeesCommand::Delete { id } => {
            section.delete(id).await?;
            println!("Employee #{} deleted", id);
        }
    }
    Ok(())
}

async fn departments(console: &Console, action: DepartmentsCommand) -> anyhow::Result<()> {
    console.admin_viewer().await?;
    console.reload().await?;
    let section = console.departments();
    match action {
        DepartmentsCommand::List => {
            println!("{:<6} {:<30} {:<25} {:>9}", "ID", "NAME", "MANAGER", "EMPLOYEES");
            for d in section.list().await {
                println!(
                    "{:<6} {:<30} {:<25} {:>9}",
                    d.id, d.name, d.manager, d.employees_count
                );
            }
        }
        DepartmentsCommand::Create {
            name,
            manager,
            description,
        } => {
            section
                .create(&DepartmentForm {
                    name,
                    manager,
                    description,
                })
                .await?;
            println!("Company created");
        }
        DepartmentsCommand::Delete { id } => {
            section.delete(id).await?;
            println!("Company #{} deleted", id);
        }
    }
    Ok(())
}

async fn attendance(console: &Console, action: AttendanceCommand) -> anyhow::Result<()> {
    console.admin_viewer().await?;
    console.reload().await?;
    let section = console.attendance();
    match action {
        AttendanceCommand::List { date, employee } => {
            println!(
                "{:<11} {:<28} {:<6} {:<6} {:>6}  {}",
                "DATE", "EMPLOYEE", "IN", "OUT", "HOURS", "STATUS"
            );
            for row in section.list(date, employee).await {
                let clock = |t: Option<chrono::NaiveTime>| {
                    t.map(|t| t.format("%H:%M").to_string())
                        .unwrap_or_else(|| "-".into())
                };
                println!(
                    "{:<11} {:<28} {:<6} {:<6} {:>6.2}  {}",
                    row.date,
                    row.employee_name,
                    clock(row.check_in),
                    clock(row.check_out),
                    row.hours_worked,
                    row.status.label()
                );
            }
        }
        AttendanceCommand::Mark {
            employee,
            date,
            check_in,
            check_out,
            status,
        } => {
            let check_in = check_in
                .as_deref()
                .map(parse_clock)
                .transpose()
                .context("check-in must be HH:MM")?;
            let check_out = check_out
                .as_deref()
                .map(parse_clock)
                .transpose()
                .context("check-out must be HH:MM")?;
            let form = AttendanceForm::new(employee, date, check_in, check_out, status)
                .map_err(ApiError::from)?;
            section.mark(&form).await?;
            println!("Attendance recorded");
        }
    }
    Ok(())
}

async fn notifications(
    console: &mut Console,
    watch: bool,
    action: Option<NotificationsCommand>,
) -> anyhow::Result<()> {
    let viewer = console.admin_viewer().await?;
    if !viewer.role.receives_reminders() {
        bail!("Reminders are not available for this account");
    }
    let sink = Arc::new(TerminalAlertSink::default());

    if let Some(NotificationsCommand::Read { id, all }) = action {
        let center = console.notifications(sink.clone());
        let outcome = match (id, all) {
            (_, true) => center.mark_all_read().await?,
            (Some(id), false) => center.mark_read(id).await?,
            (None, false) => bail!("give a reminder id or --all"),
        };
        println!("{} unread reminder(s) left", outcome.unread_count);
        if !watch {
            return Ok(());
        }
    }

    if watch {
        console.start_notifications(sink).await?;
        println!("Watching for leave reminders, press Ctrl-C to stop");
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for Ctrl-C")?;
        console.stop_notifications().await;
        return Ok(());
    }

    let feed = console.api().fetch_notifications().await?;
    match badge_text(feed.unread_count) {
        Some(badge) => println!("Unread: {}", badge),
        None => println!("No unread reminders"),
    }
    for n in &feed.notifications {
        let marker = if n.is_read { " " } else { "*" };
        println!("{} #{:<5} {}", marker, n.id, n.headline());
    }
    Ok(())
}
