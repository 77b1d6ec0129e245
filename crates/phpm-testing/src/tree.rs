//! Shorthands for building trees shaped like PHP-Parser's output, bodies
//! already wrapped in blocks.

use phpm_ast::{Ast, AstBuilder, NodeId, NodeKind, slot};

#[derive(Default)]
pub struct Tree {
    builder: AstBuilder,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self, stmts: Vec<NodeId>) -> Ast {
        self.builder.finish_statements(stmts)
    }

    pub fn builder(&mut self) -> &mut AstBuilder {
        &mut self.builder
    }

    pub fn var(&mut self, name: &str) -> NodeId {
        self.builder.node(NodeKind::Variable).str(slot::NAME, name).finish()
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        self.builder.node(NodeKind::String).str(slot::VALUE, value).finish()
    }

    pub fn lnumber(&mut self, value: &str) -> NodeId {
        self.builder.node(NodeKind::LNumber).str(slot::VALUE, value).finish()
    }

    pub fn name(&mut self, parts: &str) -> NodeId {
        self.builder.node(NodeKind::Name).str(slot::PARTS, parts).finish()
    }

    pub fn fully_qualified(&mut self, parts: &str) -> NodeId {
        self.builder.node(NodeKind::FullyQualified).str(slot::PARTS, parts).finish()
    }

    pub fn const_fetch(&mut self, name: &str) -> NodeId {
        let name = self.name(name);
        self.builder.node(NodeKind::ConstFetch).node(slot::NAME, name).finish()
    }

    pub fn binary(&mut self, kind: NodeKind, left: NodeId, right: NodeId) -> NodeId {
        self.builder.node(kind).node(slot::LEFT, left).node(slot::RIGHT, right).finish()
    }

    /// `Assign`, `AssignRef` or one of the compound assignments.
    pub fn assign(&mut self, kind: NodeKind, var: NodeId, expr: NodeId) -> NodeId {
        self.builder.node(kind).node(slot::VAR, var).node(slot::EXPR, expr).finish()
    }

    pub fn assign_list(&mut self, vars: Vec<NodeId>, expr: NodeId) -> NodeId {
        self.builder.node(NodeKind::AssignList).list(slot::VARS, vars).node(slot::EXPR, expr).finish()
    }

    pub fn unary(&mut self, kind: NodeKind, expr: NodeId) -> NodeId {
        self.builder.node(kind).node(slot::EXPR, expr).finish()
    }

    pub fn post_inc(&mut self, var: NodeId) -> NodeId {
        self.builder.node(NodeKind::PostInc).node(slot::VAR, var).finish()
    }

    pub fn block(&mut self, stmts: Vec<NodeId>) -> NodeId {
        self.builder.node(NodeKind::Block).list(slot::STMTS, stmts).finish()
    }

    pub fn echo(&mut self, exprs: Vec<NodeId>) -> NodeId {
        self.builder.node(NodeKind::Echo).list(slot::EXPRS, exprs).finish()
    }

    pub fn foreach(
        &mut self,
        expr: NodeId,
        key_var: Option<NodeId>,
        value_var: NodeId,
        by_ref: bool,
        stmts: Vec<NodeId>,
    ) -> NodeId {
        let stmts = self.block(stmts);
        self.builder
            .node(NodeKind::Foreach)
            .node(slot::EXPR, expr)
            .opt(slot::KEY_VAR, key_var)
            .flag(slot::BY_REF, by_ref)
            .node(slot::VALUE_VAR, value_var)
            .node(slot::STMTS, stmts)
            .finish()
    }

    pub fn for_loop(
        &mut self,
        init: Vec<NodeId>,
        cond: Vec<NodeId>,
        step: Vec<NodeId>,
        stmts: Vec<NodeId>,
    ) -> NodeId {
        let stmts = self.block(stmts);
        self.builder
            .node(NodeKind::For)
            .list(slot::INIT, init)
            .list(slot::COND, cond)
            .list(slot::LOOP, step)
            .node(slot::STMTS, stmts)
            .finish()
    }

    pub fn if_stmt(
        &mut self,
        cond: NodeId,
        stmts: Vec<NodeId>,
        elseifs: Vec<NodeId>,
        else_: Option<NodeId>,
    ) -> NodeId {
        let stmts = self.block(stmts);
        self.builder
            .node(NodeKind::If)
            .node(slot::COND, cond)
            .node(slot::STMTS, stmts)
            .list(slot::ELSEIFS, elseifs)
            .opt(slot::ELSE, else_)
            .finish()
    }

    pub fn else_stmt(&mut self, stmts: Vec<NodeId>) -> NodeId {
        let stmts = self.block(stmts);
        self.builder.node(NodeKind::Else).node(slot::STMTS, stmts).finish()
    }

    pub fn switch(&mut self, cond: NodeId, cases: Vec<NodeId>) -> NodeId {
        self.builder.node(NodeKind::Switch).node(slot::COND, cond).list(slot::CASES, cases).finish()
    }

    pub fn case(&mut self, cond: Option<NodeId>, stmts: Vec<NodeId>) -> NodeId {
        let stmts = self.block(stmts);
        self.builder.node(NodeKind::Case).opt(slot::COND, cond).node(slot::STMTS, stmts).finish()
    }

    pub fn break_stmt(&mut self) -> NodeId {
        self.builder.node(NodeKind::Break).none(slot::NUM).finish()
    }

    pub fn do_while(&mut self, stmts: Vec<NodeId>, cond: NodeId) -> NodeId {
        let stmts = self.block(stmts);
        self.builder.node(NodeKind::Do).node(slot::COND, cond).node(slot::STMTS, stmts).finish()
    }

    pub fn param(
        &mut self,
        name: &str,
        default: Option<NodeId>,
        ty: Option<&str>,
        by_ref: bool,
    ) -> NodeId {
        let node = self.builder.node(NodeKind::Param).str(slot::NAME, name).opt(slot::DEFAULT, default);
        let node = match ty {
            Some(ty) => node.str(slot::TYPE, ty),
            None => node.none(slot::TYPE),
        };
        node.flag(slot::BY_REF, by_ref).finish()
    }

    pub fn closure_use(&mut self, name: &str, by_ref: bool) -> NodeId {
        self.builder.node(NodeKind::ClosureUse).str(slot::VAR, name).flag(slot::BY_REF, by_ref).finish()
    }

    pub fn closure(
        &mut self,
        params: Vec<NodeId>,
        uses: Vec<NodeId>,
        stmts: Vec<NodeId>,
    ) -> NodeId {
        let stmts = self.block(stmts);
        self.builder
            .node(NodeKind::Closure)
            .flag(slot::STATIC, false)
            .flag(slot::BY_REF, false)
            .list(slot::PARAMS, params)
            .list(slot::USES, uses)
            .node(slot::STMTS, stmts)
            .finish()
    }

    pub fn function(&mut self, name: &str, by_ref: bool, params: Vec<NodeId>, stmts: Vec<NodeId>) -> NodeId {
        let stmts = self.block(stmts);
        self.builder
            .node(NodeKind::Function)
            .flag(slot::BY_REF, by_ref)
            .str(slot::NAME, name)
            .list(slot::PARAMS, params)
            .node(slot::STMTS, stmts)
            .finish()
    }

    pub fn class(&mut self, name: &str, extends: Option<NodeId>, stmts: Vec<NodeId>) -> NodeId {
        let stmts = self.block(stmts);
        self.builder
            .node(NodeKind::Class)
            .str(slot::TYPE, "0")
            .str(slot::NAME, name)
            .opt(slot::EXTENDS, extends)
            .list(slot::IMPLEMENTS, [])
            .node(slot::STMTS, stmts)
            .finish()
    }

    pub fn class_method(&mut self, name: &str, params: Vec<NodeId>, stmts: Vec<NodeId>) -> NodeId {
        let stmts = self.block(stmts);
        self.builder
            .node(NodeKind::ClassMethod)
            .str(slot::TYPE, "public")
            .flag(slot::BY_REF, false)
            .str(slot::NAME, name)
            .list(slot::PARAMS, params)
            .node(slot::STMTS, stmts)
            .finish()
    }

    /// A property declaration, one `PropertyProperty` per declared name.
    pub fn property(&mut self, modifiers: &str, props: Vec<(&str, Option<NodeId>)>) -> NodeId {
        let props = props
            .into_iter()
            .map(|(name, default)| {
                self.builder
                    .node(NodeKind::PropertyProperty)
                    .str(slot::NAME, name)
                    .opt(slot::DEFAULT, default)
                    .finish()
            })
            .collect::<Vec<_>>();
        self.builder.node(NodeKind::Property).str(slot::TYPE, modifiers).list(slot::PROPS, props).finish()
    }

    pub fn class_const(&mut self, consts: Vec<(&str, NodeId)>) -> NodeId {
        let consts = self.const_elems(consts);
        self.builder.node(NodeKind::ClassConst).list(slot::CONSTS, consts).finish()
    }

    /// A top-level `const` statement.
    pub fn const_stmt(&mut self, consts: Vec<(&str, NodeId)>) -> NodeId {
        let consts = self.const_elems(consts);
        self.builder.node(NodeKind::Const).list(slot::CONSTS, consts).finish()
    }

    fn const_elems(&mut self, consts: Vec<(&str, NodeId)>) -> Vec<NodeId> {
        consts
            .into_iter()
            .map(|(name, value)| {
                self.builder.node(NodeKind::ConstElem).str(slot::NAME, name).node(slot::VALUE, value).finish()
            })
            .collect()
    }

    pub fn try_catch(&mut self, stmts: Vec<NodeId>, catches: Vec<NodeId>) -> NodeId {
        let stmts = self.block(stmts);
        self.builder
            .node(NodeKind::TryCatch)
            .node(slot::STMTS, stmts)
            .list(slot::CATCHES, catches)
            .none(slot::FINALLY)
            .finish()
    }

    pub fn catch(&mut self, ty: &str, var: &str, stmts: Vec<NodeId>) -> NodeId {
        let ty = self.name(ty);
        let stmts = self.block(stmts);
        self.builder
            .node(NodeKind::Catch)
            .node(slot::TYPE, ty)
            .str(slot::VAR, var)
            .node(slot::STMTS, stmts)
            .finish()
    }

    pub fn return_stmt(&mut self, expr: Option<NodeId>) -> NodeId {
        self.builder.node(NodeKind::Return).opt(slot::EXPR, expr).finish()
    }

    pub fn arg(&mut self, value: NodeId, by_ref: bool) -> NodeId {
        self.builder.node(NodeKind::Arg).node(slot::VALUE, value).flag(slot::BY_REF, by_ref).finish()
    }

    pub fn func_call(&mut self, name: &str, args: Vec<NodeId>) -> NodeId {
        let name = self.name(name);
        self.builder.node(NodeKind::FuncCall).node(slot::NAME, name).list(slot::ARGS, args).finish()
    }

    pub fn new_expr(&mut self, class: NodeId, args: Vec<NodeId>) -> NodeId {
        self.builder.node(NodeKind::New).node(slot::CLASS, class).list(slot::ARGS, args).finish()
    }

    pub fn property_fetch(&mut self, var: NodeId, name: &str) -> NodeId {
        self.builder.node(NodeKind::PropertyFetch).node(slot::VAR, var).str(slot::NAME, name).finish()
    }

    pub fn method_call(&mut self, var: NodeId, name: &str, args: Vec<NodeId>) -> NodeId {
        self.builder
            .node(NodeKind::MethodCall)
            .node(slot::VAR, var)
            .str(slot::NAME, name)
            .list(slot::ARGS, args)
            .finish()
    }

    /// A method call whose name is an expression, as in `$a->{'foo'}()`.
    pub fn dynamic_method_call(&mut self, var: NodeId, name: NodeId, args: Vec<NodeId>) -> NodeId {
        self.builder
            .node(NodeKind::MethodCall)
            .node(slot::VAR, var)
            .node(slot::NAME, name)
            .list(slot::ARGS, args)
            .finish()
    }

    pub fn static_call(&mut self, class: NodeId, name: &str, args: Vec<NodeId>) -> NodeId {
        self.builder
            .node(NodeKind::StaticCall)
            .node(slot::CLASS, class)
            .str(slot::NAME, name)
            .list(slot::ARGS, args)
            .finish()
    }

    pub fn array(&mut self, items: Vec<NodeId>) -> NodeId {
        self.builder.node(NodeKind::Array).list(slot::ITEMS, items).finish()
    }

    pub fn array_item(&mut self, key: Option<NodeId>, value: NodeId, by_ref: bool) -> NodeId {
        self.builder
            .node(NodeKind::ArrayItem)
            .opt(slot::KEY, key)
            .node(slot::VALUE, value)
            .flag(slot::BY_REF, by_ref)
            .finish()
    }

    pub fn array_dim_fetch(&mut self, var: NodeId, dim: Option<NodeId>) -> NodeId {
        self.builder.node(NodeKind::ArrayDimFetch).node(slot::VAR, var).opt(slot::DIM, dim).finish()
    }

    pub fn static_vars(&mut self, vars: Vec<NodeId>) -> NodeId {
        self.builder.node(NodeKind::Static).list(slot::VARS, vars).finish()
    }

    pub fn static_var(&mut self, name: &str, default: Option<NodeId>) -> NodeId {
        self.builder.node(NodeKind::StaticVar).str(slot::NAME, name).opt(slot::DEFAULT, default).finish()
    }
}
