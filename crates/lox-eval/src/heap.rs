//! The heap: arrays, instances, classes, and user functions, all addressed
//! by arena index rather than `Rc<RefCell<_>>`, for the same reason the
//! environment chain is (see `env` module doc comment). Two array or
//! instance values compare equal iff they share an id — that *is*
//! reference equality once identity is an arena slot instead of a pointer.

use std::rc::Rc;

use lox_parse::ast::FunctionDecl;
use lox_util::{define_idx, FxHashMap, IndexVec};

use crate::env::EnvId;
use crate::value::Value;

define_idx!(ArrayId);
define_idx!(InstanceId);
define_idx!(ClassId);
define_idx!(FunctionId);

/// A user-defined function's runtime representation: the declaration it
/// was built from, the environment in force when it was declared (its
/// closure), and whether it is a class `init` method.
pub struct Function {
    pub declaration: Rc<FunctionDecl>,
    pub closure: EnvId,
    pub is_initializer: bool,
}

impl Function {
    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }
}

pub struct Class {
    pub name: String,
    pub superclass: Option<ClassId>,
    pub methods: FxHashMap<String, FunctionId>,
}

pub struct Instance {
    pub class: ClassId,
    pub fields: FxHashMap<String, Value>,
}

/// Owns every heap-allocated object a running program can create. Nothing
/// is ever freed mid-run: objects accumulate until the whole `Heap` (and
/// the interpreter that owns it) is dropped at the end of the program.
#[derive(Default)]
pub struct Heap {
    pub arrays: IndexVec<ArrayId, Vec<Value>>,
    pub instances: IndexVec<InstanceId, Instance>,
    pub classes: IndexVec<ClassId, Class>,
    pub functions: IndexVec<FunctionId, Function>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_array(&mut self, elements: Vec<Value>) -> ArrayId {
        self.arrays.push(elements)
    }

    pub fn alloc_instance(&mut self, class: ClassId) -> InstanceId {
        self.instances.push(Instance { class, fields: FxHashMap::default() })
    }

    pub fn alloc_class(&mut self, name: String, superclass: Option<ClassId>, methods: FxHashMap<String, FunctionId>) -> ClassId {
        self.classes.push(Class { name, superclass, methods })
    }

    pub fn alloc_function(&mut self, declaration: Rc<FunctionDecl>, closure: EnvId, is_initializer: bool) -> FunctionId {
        self.functions.push(Function { declaration, closure, is_initializer })
    }

    /// Traverses the superclass chain looking for `name`.
    pub fn find_method(&self, class: ClassId, name: &str) -> Option<FunctionId> {
        let mut current = Some(class);
        while let Some(id) = current {
            let class = &self.classes[id];
            if let Some(&method) = class.methods.get(name) {
                return Some(method);
            }
            current = class.superclass;
        }
        None
    }
}
