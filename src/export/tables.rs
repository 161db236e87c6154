//! Builders turning computed views into [`ExportTable`]s.

use crate::core::cash::CashLine;
use crate::core::expenses::ExpenseGroup;
use crate::core::payroll::PayrollSheet;
use crate::core::reports::{TransferGroup, WorkerSummary};
use crate::export::model::ExportTable;
use crate::models::audit::AuditEntry;
use crate::models::client::Client;
use crate::models::invoice::Invoice;
use crate::models::job::ServiceJob;
use crate::models::value::{number, opt_number, round2};
use serde_json::Value;
use std::collections::HashMap;

fn text(s: &Option<String>) -> Value {
    s.clone().map(Value::from).unwrap_or(Value::Null)
}

fn name_of(names: &HashMap<String, String>, id: &Option<String>) -> Value {
    match id.as_deref() {
        Some(id) => Value::from(names.get(id).cloned().unwrap_or_else(|| id.to_string())),
        None => Value::Null,
    }
}

pub fn jobs_table(title: &str, jobs: &[(String, ServiceJob)], names: &HashMap<String, String>) -> ExportTable {
    let mut t = ExportTable::new(
        title,
        &[
            "realizadopor", "direccion", "anombrede", "servicio", "cubicos", "valor", "pago",
            "formadepago", "metododepago", "banco", "efectivo", "factura", "fecha", "notas",
        ],
    );
    let mut valor = 0.0;
    let mut efectivo = 0.0;
    for (_, j) in jobs {
        valor += j.valor.unwrap_or(0.0);
        efectivo += j.efectivo.unwrap_or(0.0);
        t.push(vec![
            name_of(names, &j.realizadopor),
            text(&j.direccion),
            text(&j.anombrede),
            text(&j.servicio),
            opt_number(j.cubicos),
            opt_number(j.valor),
            text(&j.pago),
            text(&j.formadepago),
            text(&j.metododepago),
            text(&j.banco),
            opt_number(j.efectivo),
            Value::from(j.factura),
            text(&j.fecha),
            text(&j.notas),
        ]);
    }
    let mut footer = vec![Value::Null; t.headers.len()];
    footer[0] = Value::from("TOTAL");
    footer[5] = number(round2(valor));
    footer[10] = number(round2(efectivo));
    t.with_footer(footer)
}

pub fn clients_table(clients: &[(String, Client)]) -> ExportTable {
    let mut t = ExportTable::new("Clientes", &["direccion", "anombrede", "cubicos", "valor", "email"]);
    for (_, c) in clients {
        t.push(vec![
            text(&c.direccion),
            text(&c.anombrede),
            opt_number(c.cubicos),
            opt_number(c.valor),
            text(&c.email),
        ]);
    }
    t
}

pub fn invoices_table(invoices: &[(String, Invoice)]) -> ExportTable {
    let mut t = ExportTable::new(
        "Facturas emitidas",
        &[
            "numerodefactura", "fechaemision", "facturar a", "item", "qty", "rate", "amount",
            "pago", "fechapago", "balance",
        ],
    );
    let mut amount = 0.0;
    let mut balance = 0.0;
    for (_, inv) in invoices {
        amount += inv.amount;
        balance += inv.balance_due();
        t.push(vec![
            text(&inv.numerodefactura),
            text(&inv.fechaemision),
            Value::from(inv.bill_to()),
            text(&inv.item),
            number(inv.qty),
            number(inv.rate),
            number(inv.amount),
            Value::from(inv.pago),
            text(&inv.fechapago),
            number(inv.balance_due()),
        ]);
    }
    let mut footer = vec![Value::Null; t.headers.len()];
    footer[0] = Value::from("TOTAL");
    footer[6] = number(round2(amount));
    footer[9] = number(round2(balance));
    t.with_footer(footer)
}

pub fn expenses_table(groups: &[ExpenseGroup], grand_total: f64) -> ExportTable {
    let mut t = ExportTable::new(
        "Gastos",
        &[
            "grupo", "fecha", "categoria", "descripcion", "proveedor", "metodo_pago", "banco",
            "monto", "num_factura", "responsable",
        ],
    );
    for g in groups {
        for (_, e) in &g.expenses {
            t.push(vec![
                Value::from(g.key.clone()),
                text(&e.fecha),
                text(&e.categoria),
                text(&e.descripcion),
                text(&e.proveedor),
                text(&e.metodo_pago),
                text(&e.banco),
                number(e.monto),
                text(&e.num_factura),
                text(&e.responsable),
            ]);
        }
        let mut subtotal = vec![Value::Null; 10];
        subtotal[0] = Value::from(format!("Subtotal {}", g.key));
        subtotal[7] = number(g.total);
        t.push(subtotal);
    }
    let mut footer = vec![Value::Null; t.headers.len()];
    footer[0] = Value::from("TOTAL");
    footer[7] = number(grand_total);
    t.with_footer(footer)
}

pub fn payroll_table(sheet: &PayrollSheet, names: &HashMap<String, String>) -> ExportTable {
    let mut t = ExportTable::new(
        format!(
            "Nomina {} a {}",
            sheet.run.fecha_desde, sheet.run.fecha_hasta
        ),
        &[
            "nombre", "dias", "valor", "total_quincena", "extra", "deducciones", "total_nomina",
            "efectivo", "total", "entregado", "balance",
        ],
    );
    for (_, row) in sheet.rows() {
        t.push(vec![
            name_of(names, &row.nombre),
            number(row.dias),
            number(row.valor),
            number(row.total_quincena),
            number(row.extra),
            number(row.deducciones),
            number(row.total_nomina),
            number(row.efectivo),
            number(row.total),
            number(row.entregado),
            number(row.balance()),
        ]);
    }
    let s = sheet.totals();
    t.with_footer(vec![
        Value::from("TOTAL"),
        Value::Null,
        Value::Null,
        number(s.total_quincena),
        number(s.extra),
        number(s.deducciones),
        number(s.total_nomina),
        number(s.efectivo),
        number(s.total),
        number(s.entregado),
        number(s.balance),
    ])
}

pub fn cash_table(worker: &str, lines: &[CashLine]) -> ExportTable {
    let mut t = ExportTable::new(
        format!("Informe de efectivo: {}", worker),
        &["fecha", "metododepago", "efectivo", "saldo", "direccion", "notas", "origen"],
    );
    for l in lines {
        t.push(vec![
            text(&l.entry.fecha),
            text(&l.entry.metododepago),
            number(l.entry.efectivo),
            number(l.balance),
            text(&l.entry.direccion),
            text(&l.entry.notas),
            text(&l.entry.origen),
        ]);
    }
    t
}

pub fn history_table(entries: &[AuditEntry]) -> ExportTable {
    let mut t = ExportTable::new(
        "Historial de cambios",
        &["fecha", "hora", "usuario", "lugar", "id", "cambio"],
    );
    for e in entries {
        t.push(vec![
            Value::from(e.fecha.clone()),
            Value::from(e.hora.clone()),
            Value::from(e.usuario.clone()),
            Value::from(e.lugar.clone()),
            Value::from(e.record_id.clone()),
            Value::from(e.cambio.clone()),
        ]);
    }
    t
}

pub fn transfers_table(groups: &[TransferGroup], names: &HashMap<String, String>) -> ExportTable {
    let mut t = ExportTable::new(
        "Transferencias",
        &["banco", "fecha", "direccion", "anombrede", "realizadopor", "valor"],
    );
    let mut grand = 0.0;
    for g in groups {
        for rj in &g.jobs {
            t.push(vec![
                Value::from(g.banco.clone()),
                Value::from(rj.fecha.clone()),
                text(&rj.job.direccion),
                text(&rj.job.anombrede),
                name_of(names, &rj.job.realizadopor),
                opt_number(rj.job.valor),
            ]);
        }
        t.push(vec![
            Value::from(format!("Subtotal {}", g.banco)),
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
            number(g.total),
        ]);
        grand += g.total;
    }
    t.with_footer(vec![
        Value::from("TOTAL"),
        Value::Null,
        Value::Null,
        Value::Null,
        Value::Null,
        number(round2(grand)),
    ])
}

pub fn services_table(summary: &[WorkerSummary]) -> ExportTable {
    let mut t = ExportTable::new("Servicios por trabajador", &["trabajador", "servicios", "cubicos", "valor"]);
    let (mut n, mut cub, mut val) = (0usize, 0.0, 0.0);
    for w in summary {
        n += w.services;
        cub += w.cubicos;
        val += w.valor;
        t.push(vec![
            Value::from(w.name.clone()),
            Value::from(w.services),
            number(w.cubicos),
            number(w.valor),
        ]);
    }
    t.with_footer(vec![
        Value::from("TOTAL"),
        Value::from(n),
        number(round2(cub)),
        number(round2(val)),
    ])
}
