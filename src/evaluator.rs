use crate::{
    ast::{Modifiers, Token},
    error::{PathError, Result},
    grammar::{ContainerRole, WILDCARD},
    methods,
    value::Value,
    wildcard,
};

/// Walks token trees against a data root.
///
/// One evaluator serves one `get`/`set` call: it carries the positional
/// arguments for that call and the engine settings that affect resolution.
/// Every walk keeps a value stack, the history of contexts visited so far
/// with the root first, which parent and root modifiers index into.
///
/// Any word that misses on a callable context resolves to its own text,
/// plain words included and not only modified ones, so `f(a,b)` passes
/// the strings `a` and `b`.
pub struct Evaluator<'a> {
    args: &'a [Value],
    auto_vivify: bool,
    max_depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(args: &'a [Value], auto_vivify: bool, max_depth: usize) -> Self {
        Evaluator {
            args,
            auto_vivify,
            max_depth,
        }
    }

    /// Resolve a path with no special characters by splitting it on the
    /// property separator. Each segment is a literal key.
    pub fn resolve_flat(
        &self,
        root: &Value,
        path: &str,
        separator: char,
        new_value: Option<&Value>,
    ) -> Result<Value> {
        let segments: Vec<&str> = path.split(separator).collect();
        let mut position = 0;
        for segment in &segments {
            if segment.is_empty() {
                return Err(PathError::syntax(position, "empty path segment"));
            }
            position += segment.chars().count() + 1;
        }

        let last = segments.len() - 1;
        let mut context = root.clone();
        for (idx, segment) in segments.iter().enumerate() {
            let write = if idx == last { new_value } else { None };
            let vivify = self.auto_vivify && new_value.is_some() && idx != last;
            context = self.step_key(&context, segment, write, vivify)?;
        }
        Ok(context)
    }

    /// Resolve a token tree from the root
    pub fn resolve(
        &self,
        root: &Value,
        tokens: &[Token],
        new_value: Option<&Value>,
    ) -> Result<Value> {
        self.walk(root, tokens, vec![root.clone()], new_value, 0)
    }

    /// Walk `tokens` starting at `base`. The last entry of `stack` is `base`.
    fn walk(
        &self,
        base: &Value,
        tokens: &[Token],
        mut stack: Vec<Value>,
        new_value: Option<&Value>,
        level: usize,
    ) -> Result<Value> {
        if level > self.max_depth {
            return Err(PathError::DepthExceeded(self.max_depth));
        }
        if tokens.is_empty() {
            return Err(PathError::resolution("path has no steps"));
        }

        let last = tokens.len() - 1;
        let mut context = base.clone();
        for (idx, token) in tokens.iter().enumerate() {
            let write = if idx == last { new_value } else { None };
            let vivify = self.auto_vivify && new_value.is_some() && idx != last;

            let result = match token {
                Token::Word(word) => self.step_key(&context, word, write, vivify)?,
                Token::Modified { word, mods } => {
                    self.step_modified(&context, word, mods, &mut stack, write)?
                }
                Token::Collection(members) => {
                    self.step_collection(&context, members, &stack, write, level)?
                }
                Token::Container { tree, role } => match role {
                    ContainerRole::Call => {
                        if write.is_some() {
                            return Err(PathError::resolution("a call result cannot be assigned"));
                        }
                        self.step_call(&context, tree, &stack, level)?
                    }
                    ContainerRole::EvalProperty => {
                        let key = self.computed_key(&context, tree, &stack, level)?;
                        self.step_key(&context, &key, write, vivify)?
                    }
                    ContainerRole::Property | ContainerRole::Quote => {
                        self.walk(&context, tree, stack.clone(), write, level + 1)?
                    }
                },
            };

            tracing::trace!(step = idx, kind = result.type_name(), "resolved path step");
            stack.push(result.clone());
            context = result;
        }
        Ok(context)
    }

    /// Index `context` by a literal key, or assign it on the final write step
    fn step_key(
        &self,
        context: &Value,
        key: &str,
        write: Option<&Value>,
        vivify: bool,
    ) -> Result<Value> {
        if let Some(value) = write {
            context.set_key(key, value.clone())?;
            if !context.has_key(key) {
                return Err(PathError::resolution(format!(
                    "assignment to '{}' did not take effect",
                    key
                )));
            }
            return Ok(value.clone());
        }
        if let Some(found) = context.get_key(key) {
            return Ok(found);
        }
        if vivify && context.is_container() {
            let fresh = Value::empty_map();
            context.set_key(key, fresh.clone())?;
            return Ok(fresh);
        }
        if let Some(intrinsic) = methods::lookup(context, key) {
            return Ok(intrinsic);
        }
        if context.is_callable() {
            // bare word used as a call argument
            return Ok(Value::String(key.to_string()));
        }
        Err(missing_key(context, key))
    }

    /// Apply modifiers in order: parent, root, placeholder, context.
    fn step_modified(
        &self,
        context: &Value,
        word: &str,
        mods: &Modifiers,
        stack: &mut Vec<Value>,
        write: Option<&Value>,
    ) -> Result<Value> {
        let mut target = context.clone();
        if mods.parent > 0 {
            let len = stack.len();
            if mods.parent >= len {
                return Err(PathError::resolution(format!(
                    "parent level {} reaches past the root",
                    mods.parent
                )));
            }
            target = stack[len - 1 - mods.parent].clone();
        }
        if mods.root > 0 {
            stack.truncate(1);
            target = stack[0].clone();
        }

        let mut key = word.to_string();
        if mods.placeholder > 0 {
            key = self.argument(&key)?.to_key()?;
        }
        if mods.context > 0 {
            if write.is_some() {
                return Err(PathError::resolution(
                    "a context argument cannot be the target of a write",
                ));
            }
            return Ok(self.argument(&key)?.clone());
        }

        if target.has_key(&key) {
            if let Some(value) = write {
                target.set_key(&key, value.clone())?;
                return Ok(value.clone());
            }
            return target.get_key(&key).ok_or_else(|| missing_key(&target, &key));
        }
        if key.contains(WILDCARD) {
            return self.match_wildcard(&target, &key, write);
        }
        if write.is_none() {
            if let Some(intrinsic) = methods::lookup(&target, &key) {
                return Ok(intrinsic);
            }
        }
        if target.is_callable() {
            return Ok(Value::String(key));
        }
        Err(missing_key(&target, &key))
    }

    fn match_wildcard(
        &self,
        target: &Value,
        pattern: &str,
        write: Option<&Value>,
    ) -> Result<Value> {
        let keys: Vec<String> = target
            .own_keys()
            .into_iter()
            .filter(|key| wildcard::matches(pattern, key))
            .collect();
        let mut matched = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = write {
                target.set_key(&key, value.clone())?;
            }
            if let Some(found) = target.get_key(&key) {
                matched.push(found);
            }
        }
        Ok(Value::list(matched))
    }

    /// Resolve each member against the same context with its own copy of
    /// the stack, concatenating the results
    fn step_collection(
        &self,
        context: &Value,
        members: &[Token],
        stack: &[Value],
        write: Option<&Value>,
        level: usize,
    ) -> Result<Value> {
        let mut results = Vec::new();
        for member in members {
            let branch = stack.to_vec();
            let result = match member {
                Token::Container {
                    tree,
                    role: ContainerRole::EvalProperty,
                } => {
                    let key = self.computed_key(context, tree, stack, level)?;
                    self.step_key(context, &key, write, false)?
                }
                Token::Container {
                    tree,
                    role: ContainerRole::Property | ContainerRole::Quote,
                } => self.walk(context, tree, branch, write, level + 1)?,
                other => self.walk(context, std::slice::from_ref(other), branch, write, level + 1)?,
            };
            match result {
                Value::List(items) => results.extend(items.borrow().iter().cloned()),
                single => results.push(single),
            }
        }
        Ok(Value::list(results))
    }

    /// Invoke the context with arguments resolved from `tree`. The receiver
    /// is the value one frame back on the stack.
    fn step_call(
        &self,
        context: &Value,
        tree: &[Token],
        stack: &[Value],
        level: usize,
    ) -> Result<Value> {
        let Value::Callable(callable) = context else {
            return Err(PathError::NotCallable(format!(
                "a {} cannot be called",
                context.type_name()
            )));
        };

        let args = if tree.is_empty() {
            Vec::new()
        } else {
            match self.walk(context, tree, stack.to_vec(), None, level + 1)? {
                Value::List(items) => items.borrow().clone(),
                single => vec![single],
            }
        };
        let receiver = match stack.len() {
            len if len >= 2 => stack[len - 2].clone(),
            _ => Value::Null,
        };

        tracing::trace!(name = callable.name(), argc = args.len(), "calling");
        callable.call(&receiver, &args)
    }

    fn computed_key(
        &self,
        context: &Value,
        tree: &[Token],
        stack: &[Value],
        level: usize,
    ) -> Result<String> {
        self.walk(context, tree, stack.to_vec(), None, level + 1)?
            .to_key()
    }

    /// Positional argument named by a 1-based index in `text`
    fn argument(&self, text: &str) -> Result<&'a Value> {
        let index = text
            .parse::<usize>()
            .map_err(|_| PathError::resolution(format!("'{}' is not an argument index", text)))?;
        index
            .checked_sub(1)
            .and_then(|i| self.args.get(i))
            .ok_or_else(|| {
                PathError::resolution(format!(
                    "argument {} requested but {} supplied",
                    index,
                    self.args.len()
                ))
            })
    }
}

fn missing_key(context: &Value, key: &str) -> PathError {
    PathError::resolution(format!("no key '{}' on {}", key, context.type_name()))
}
