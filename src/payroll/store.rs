//! Payroll record persistence.
//!
//! The store owns the uniqueness of `(employee_id, pay_period)`. Callers may
//! check [`PayrollStore::find`] first to skip work, but only
//! [`PayrollStore::insert`] decides whether a record is created.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::RwLock;

use crate::error::{EngineError, EngineResult};
use crate::models::{PayPeriod, Payroll};

/// Persistence for generated payroll records.
pub trait PayrollStore: Send + Sync {
    /// Returns the record for the key, if one exists.
    fn find(&self, employee_id: u64, pay_period: PayPeriod) -> EngineResult<Option<Payroll>>;

    /// Inserts a record unless its key is already taken.
    ///
    /// The check and the insert must be a single atomic operation. A taken key
    /// yields [`EngineError::PayrollAlreadyExists`] and leaves the existing
    /// record untouched.
    fn insert(&self, payroll: Payroll) -> EngineResult<()>;

    /// Records the payslip location on an existing record.
    fn attach_payslip_link(
        &self,
        employee_id: u64,
        pay_period: PayPeriod,
        link: String,
    ) -> EngineResult<()>;

    /// All records for the employee, oldest period first.
    fn list_for_employee(&self, employee_id: u64) -> EngineResult<Vec<Payroll>>;
}

type PayrollKey = (u64, PayPeriod);

/// A [`PayrollStore`] kept in process memory.
///
/// One lock guards the whole map, so the existence check and the insert run
/// under the same write guard.
#[derive(Debug, Default)]
pub struct InMemoryPayrollStore {
    records: RwLock<HashMap<PayrollKey, Payroll>>,
}

impl InMemoryPayrollStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> EngineResult<usize> {
        Ok(self.read()?.len())
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> EngineResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(
        &self,
    ) -> EngineResult<std::sync::RwLockReadGuard<'_, HashMap<PayrollKey, Payroll>>> {
        self.records.read().map_err(|_| poisoned())
    }

    fn write(
        &self,
    ) -> EngineResult<std::sync::RwLockWriteGuard<'_, HashMap<PayrollKey, Payroll>>> {
        self.records.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> EngineError {
    EngineError::Storage {
        message: "payroll store lock poisoned".to_string(),
    }
}

impl PayrollStore for InMemoryPayrollStore {
    fn find(&self, employee_id: u64, pay_period: PayPeriod) -> EngineResult<Option<Payroll>> {
        Ok(self.read()?.get(&(employee_id, pay_period)).cloned())
    }

    fn insert(&self, payroll: Payroll) -> EngineResult<()> {
        let mut records = self.write()?;
        match records.entry((payroll.employee_id, payroll.pay_period)) {
            Entry::Occupied(_) => Err(EngineError::PayrollAlreadyExists {
                employee_id: payroll.employee_id,
                pay_period: payroll.pay_period,
            }),
            Entry::Vacant(slot) => {
                slot.insert(payroll);
                Ok(())
            }
        }
    }

    fn attach_payslip_link(
        &self,
        employee_id: u64,
        pay_period: PayPeriod,
        link: String,
    ) -> EngineResult<()> {
        let mut records = self.write()?;
        let record = records
            .get_mut(&(employee_id, pay_period))
            .ok_or(EngineError::PayrollNotFound {
                employee_id,
                pay_period,
            })?;
        record.payslip_link = Some(link);
        Ok(())
    }

    fn list_for_employee(&self, employee_id: u64) -> EngineResult<Vec<Payroll>> {
        let mut payrolls: Vec<Payroll> = self
            .read()?
            .values()
            .filter(|p| p.employee_id == employee_id)
            .cloned()
            .collect();
        payrolls.sort_by_key(|p| p.pay_period);
        Ok(payrolls)
    }
}
