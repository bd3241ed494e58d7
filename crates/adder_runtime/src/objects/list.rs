use std::cell::{Ref, RefCell};
use std::cmp::Ordering;
use std::rc::Rc;

use crate::Runtime;
use crate::builtins::common::{check_arity, no_kwargs};
use crate::core::object::{AsAny, Kwargs, Object, Value, address_of, fallback_attr};
use crate::core::types::{OBJECT_TYPE, TypeInfo};
use crate::errors::{RunError, RunResult};
use crate::iter::seq::ListIterator;
use crate::methods::{BoundMethod, MethodKind};
use crate::objects::sequence::{
    CmpOp, SeqKey, normalize_index, repeat_count, repeat_values, seq_compare, seq_contains, seq_equals, seq_key, seq_repr,
};

pub static LIST_TYPE: TypeInfo = TypeInfo::with_ctor("list", &OBJECT_TYPE, construct_list);

/// Mutable sequence. Element comparisons run on snapshots, never while the
/// cell is borrowed.
pub struct List {
    items: RefCell<Vec<Value>>,
}

impl List {
    pub fn new(items: Vec<Value>) -> Self {
        List { items: RefCell::new(items) }
    }

    pub fn value(items: Vec<Value>) -> Value {
        Value::new(List::new(items))
    }

    pub fn items(&self) -> Ref<'_, Vec<Value>> {
        self.items.borrow()
    }

    pub fn snapshot(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    pub fn size(&self) -> usize {
        self.items.borrow().len()
    }

    /// Element at `index`, or `None` past the end. Used by the live iterator.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    pub fn push(&self, item: Value) {
        self.items.borrow_mut().push(item);
    }

    /// Appends every item of `src`; `src` may be this list.
    pub fn extend_from(&self, src: &Value) -> RunResult<()> {
        let extra = match src.downcast_ref::<List>() {
            Some(other) => other.snapshot(),
            None => src.to_vec()?,
        };
        self.items.borrow_mut().extend(extra);
        Ok(())
    }

    pub fn insert(&self, index: i64, item: Value) {
        let mut items = self.items.borrow_mut();
        let len = items.len() as i64;
        let pos = if index < 0 { (index + len).max(0) } else { index.min(len) };
        items.insert(pos as usize, item);
    }

    pub fn pop(&self, index: i64) -> RunResult<Value> {
        let mut items = self.items.borrow_mut();
        if items.is_empty() {
            return Err(RunError::index_error("pop from empty list"));
        }
        let pos = normalize_index(index, items.len(), "pop")?;
        Ok(items.remove(pos))
    }

    pub fn remove(&self, item: &Value) -> RunResult<()> {
        let snapshot = self.snapshot();
        for (i, candidate) in snapshot.iter().enumerate() {
            if candidate.equals(item)? {
                let mut items = self.items.borrow_mut();
                if i < items.len() {
                    items.remove(i);
                }
                return Ok(());
            }
        }
        Err(RunError::value_error("list.remove(x): x not in list"))
    }

    pub fn clear(&self) {
        self.items.borrow_mut().clear();
    }

    pub fn reverse(&self) {
        self.items.borrow_mut().reverse();
    }

    /// Stable in-place sort by `<`. The first comparison error aborts the sort
    /// and leaves the list holding its items in some permutation.
    pub fn sort(&self, reverse: bool) -> RunResult<()> {
        let mut items = std::mem::take(&mut *self.items.borrow_mut());
        let result = sort_values(&mut items, reverse);
        *self.items.borrow_mut() = items;
        result
    }

    fn compare(&self, rhs: &Value, op: CmpOp) -> RunResult<bool> {
        match rhs.downcast_ref::<List>() {
            Some(other) => seq_compare(&self.snapshot(), &other.snapshot(), op),
            None => Err(RunError::comparison_error(op.symbol(), LIST_TYPE.name, rhs)),
        }
    }
}

/// Stable sort of `items` by `<`, reporting the first comparison error.
pub fn sort_values(items: &mut [Value], reverse: bool) -> RunResult<()> {
    let mut first_err = None;
    items.sort_by(|a, b| {
        if first_err.is_some() {
            return Ordering::Equal;
        }
        let ord = match a.lt(b) {
            Ok(true) => Ok(Ordering::Less),
            Ok(false) => b.lt(a).map(|gt| if gt { Ordering::Greater } else { Ordering::Equal }),
            Err(e) => Err(e),
        };
        match ord {
            Ok(ord) if reverse => ord.reverse(),
            Ok(ord) => ord,
            Err(e) => {
                first_err = Some(e);
                Ordering::Equal
            }
        }
    });
    first_err.map_or(Ok(()), Err)
}

impl Object for List {
    fn type_info(&self) -> &'static TypeInfo {
        &LIST_TYPE
    }

    fn add(&self, rhs: &Value) -> RunResult<Value> {
        let Some(other) = rhs.downcast_ref::<List>() else {
            return Err(RunError::type_error(format!(
                "can only concatenate list (not \"{}\") to list",
                rhs.type_name()
            )));
        };
        let mut items = self.snapshot();
        items.extend(other.snapshot());
        Ok(List::value(items))
    }

    fn add_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        self.extend_from(rhs)?;
        Ok(self.into_value())
    }

    fn mul(&self, rhs: &Value) -> RunResult<Value> {
        let items = self.items.borrow();
        let n = repeat_count(rhs, items.len())?;
        Ok(List::value(repeat_values(&items, n)))
    }

    fn mul_in_place(self: Rc<Self>, rhs: &Value) -> RunResult<Value> {
        let repeated = {
            let items = self.items.borrow();
            let n = repeat_count(rhs, items.len())?;
            repeat_values(&items, n)
        };
        *self.items.borrow_mut() = repeated;
        Ok(self.into_value())
    }

    fn lt(&self, rhs: &Value) -> RunResult<bool> {
        self.compare(rhs, CmpOp::Lt)
    }
    fn le(&self, rhs: &Value) -> RunResult<bool> {
        self.compare(rhs, CmpOp::Le)
    }
    fn gt(&self, rhs: &Value) -> RunResult<bool> {
        self.compare(rhs, CmpOp::Gt)
    }
    fn ge(&self, rhs: &Value) -> RunResult<bool> {
        self.compare(rhs, CmpOp::Ge)
    }

    fn get_item(&self, key: &Value) -> RunResult<Value> {
        let items = self.items.borrow();
        match seq_key(key, "list")? {
            SeqKey::Index(i) => Ok(items[normalize_index(i, items.len(), "list")?].clone()),
            SeqKey::Slice(s) => {
                let idx = s.indices(items.len())?;
                Ok(List::value(idx.positions().map(|p| items[p].clone()).collect()))
            }
        }
    }

    fn set_item(&self, key: &Value, value: Value) -> RunResult<()> {
        match seq_key(key, "list")? {
            SeqKey::Index(i) => {
                let mut items = self.items.borrow_mut();
                let pos = normalize_index(i, items.len(), "list assignment")?;
                items[pos] = value;
                Ok(())
            }
            SeqKey::Slice(_) => Err(RunError::unsupported("slice assignment", LIST_TYPE.name)),
        }
    }

    fn del_item(&self, key: &Value) -> RunResult<()> {
        match seq_key(key, "list")? {
            SeqKey::Index(i) => {
                let mut items = self.items.borrow_mut();
                let pos = normalize_index(i, items.len(), "list assignment")?;
                items.remove(pos);
                Ok(())
            }
            SeqKey::Slice(_) => Err(RunError::unsupported("slice deletion", LIST_TYPE.name)),
        }
    }

    fn get_attr(self: Rc<Self>, name: &str) -> RunResult<Value> {
        let kind = MethodKind::from_str(name);
        if crate::methods::list::supports(kind) {
            return Ok(BoundMethod::value(self.into_value(), kind));
        }
        fallback_attr(&LIST_TYPE, name)
    }

    fn iter(self: Rc<Self>) -> RunResult<Value> {
        Ok(Value::new(ListIterator::new(self)))
    }

    fn bool_value(&self) -> RunResult<bool> {
        Ok(!self.items.borrow().is_empty())
    }

    fn contains(&self, item: &Value) -> RunResult<bool> {
        seq_contains(&self.snapshot(), item)
    }

    fn equals(&self, rhs: &Value) -> RunResult<bool> {
        match rhs.downcast_ref::<List>() {
            Some(other) => seq_equals(&self.snapshot(), &other.snapshot()),
            None => Ok(false),
        }
    }

    fn hash_code(&self) -> RunResult<i64> {
        Err(RunError::unhashable(LIST_TYPE.name))
    }

    fn len(&self) -> RunResult<i64> {
        Ok(self.size() as i64)
    }

    fn repr(&self) -> RunResult<String> {
        seq_repr(&self.snapshot(), "[", "]", address_of(self), "[...]")
    }

    fn has_iter(&self) -> bool {
        true
    }

    fn has_len(&self) -> bool {
        true
    }
}

fn construct_list(_rt: &mut Runtime, _ty: &'static TypeInfo, args: &[Value], kwargs: Kwargs<'_>) -> RunResult<Value> {
    no_kwargs("list", kwargs)?;
    check_arity("list", args, 0, 1)?;
    match args.first() {
        None => Ok(List::value(Vec::new())),
        Some(src) => Ok(List::value(src.to_vec()?)),
    }
}
